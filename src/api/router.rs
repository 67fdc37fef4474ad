use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, event, registration, export, settings};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Public Catalogue
        .route("/api/v1/events", get(event::list_events))
        .route("/api/v1/events/{event_id}", get(event::get_event))
        .route("/api/v1/categories", get(event::list_categories))
        .route("/api/v1/categories/{category}/dates", get(event::list_category_dates))
        .route("/api/v1/categories/{category}/dates/{date}/events", get(event::list_events_for_date))

        // Public Registration
        .route("/api/v1/registrations", post(registration::create_registration))

        // Admin Events
        .route("/api/v1/admin/events", get(event::admin_list_events).post(event::create_event))
        .route("/api/v1/admin/events/{event_id}", get(event::admin_get_event).put(event::update_event).delete(event::delete_event))

        // Admin Registrations
        .route("/api/v1/admin/registrations", get(registration::list_registrations))
        .route("/api/v1/admin/registrations/export", get(export::export_registrations))
        .route("/api/v1/admin/registrations/{registration_id}", delete(registration::delete_registration))

        // Admin Settings
        .route("/api/v1/admin/settings", get(settings::get_settings).put(settings::update_settings))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        admin = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
