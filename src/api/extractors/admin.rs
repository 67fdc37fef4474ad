use axum::{
    extract::{FromRequestParts, FromRef},
    http::{header, request::Parts},
};
use constant_time_eq::constant_time_eq;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::{warn, Span};

/// Marks a handler as admin-only. Requires `Authorization: Bearer <ADMIN_API_KEY>`.
pub struct AdminUser;

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let token = parts.headers.get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .ok_or(AppError::Unauthorized)?;

        let key = app_state.config.admin_api_key.as_bytes();
        if token.is_empty() || !constant_time_eq(token.as_bytes(), key) {
            warn!("Rejected admin request to {}", parts.uri.path());
            return Err(AppError::Unauthorized);
        }

        Span::current().record("admin", true);
        Ok(AdminUser)
    }
}
