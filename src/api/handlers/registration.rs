use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::admin::AdminUser;
use crate::api::dtos::requests::{CreateRegistrationRequest, RegistrationQuery};
use crate::api::dtos::responses::{RegistrationCreatedResponse, RegistrationListResponse};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_registration(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateRegistrationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (event_id, registrant) = payload.into_parts();
    let outcome = state.admission_service.register(&event_id, registrant).await?;
    Ok((StatusCode::CREATED, Json(RegistrationCreatedResponse::from(outcome))))
}

pub async fn list_registrations(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(query): Query<RegistrationQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = query.into_filter()?;
    let total = state.registration_repo.count_for(&filter).await?;
    let registrations = state.registration_repo.list_for(&filter).await?;
    Ok(Json(RegistrationListResponse { total, registrations }))
}

pub async fn delete_registration(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(registration_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.registration_repo.delete(&registration_id).await?;
    info!("Admin deleted registration {}", registration_id);
    Ok(StatusCode::NO_CONTENT)
}
