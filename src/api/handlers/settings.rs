use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::admin::AdminUser;
use crate::api::dtos::requests::UpdateSettingsRequest;
use crate::domain::models::settings::NotificationSettings;
use crate::domain::services::eligibility::is_valid_email;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.settings_repo.get().await?))
}

pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let admin_email = payload.admin_email.trim().to_lowercase();

    if payload.admin_notification_enabled && admin_email.is_empty() {
        return Err(AppError::Validation("An admin email is required to enable notifications".into()));
    }
    if !admin_email.is_empty() && !is_valid_email(&admin_email) {
        return Err(AppError::Validation("Invalid admin email address".into()));
    }

    let settings = NotificationSettings {
        admin_email,
        admin_notification_enabled: payload.admin_notification_enabled,
    };
    let saved = state.settings_repo.save(&settings).await?;
    info!(enabled = saved.admin_notification_enabled, "Notification settings updated");
    Ok(Json(saved))
}
