use axum::{extract::{State, Query}, http::header, response::IntoResponse};
use crate::state::AppState;
use crate::api::extractors::admin::AdminUser;
use crate::api::dtos::requests::RegistrationQuery;
use crate::domain::services::export::{export_filename, render_csv};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn export_registrations(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(query): Query<RegistrationQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = query.into_filter()?;
    let rows = state.registration_repo.list_for(&filter).await?;
    let filename = export_filename(state.clock.now());

    info!(rows = rows.len(), "Exporting registrations to {}", filename);

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", filename)),
        (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate".to_string()),
        (header::X_CONTENT_TYPE_OPTIONS, "nosniff".to_string()),
        (header::X_FRAME_OPTIONS, "DENY".to_string()),
    ];

    Ok((headers, render_csv(&rows)))
}
