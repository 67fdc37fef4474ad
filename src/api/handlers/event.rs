use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::admin::AdminUser;
use crate::api::dtos::responses::EventView;
use crate::domain::models::event::{Event, EventData};
use crate::error::AppError;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;

async fn to_view(state: &AppState, event: Event) -> Result<EventView, AppError> {
    let availability = state.capacity_checker.remaining(&event).await?;
    Ok(EventView::new(event, availability, state.clock.now()))
}

async fn to_views(state: &AppState, events: Vec<Event>) -> Result<Vec<EventView>, AppError> {
    let mut views = Vec::with_capacity(events.len());
    for event in events {
        views.push(to_view(state, event).await?);
    }
    Ok(views)
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format (YYYY-MM-DD)".into()))
}

// --- Public ---

pub async fn list_events(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let events = state.event_repo.list_active().await?;
    Ok(Json(to_views(&state, events).await?))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .filter(|e| e.active)
        .ok_or(AppError::EventNotFound)?;
    Ok(Json(to_view(&state, event).await?))
}

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.event_repo.categories().await?))
}

pub async fn list_category_dates(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.event_repo.dates_for_category(&category).await?))
}

pub async fn list_events_for_date(
    State(state): State<Arc<AppState>>,
    Path((category, date)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(&date)?;
    let events = state.event_repo.list_by_category_and_date(&category, date).await?;
    Ok(Json(to_views(&state, events).await?))
}

// --- Admin ---

pub async fn admin_list_events(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let events = state.event_repo.list_all().await?;
    Ok(Json(to_views(&state, events).await?))
}

pub async fn admin_get_event(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::EventNotFound)?;
    Ok(Json(to_view(&state, event).await?))
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<EventData>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(to_view(&state, event).await?)))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(event_id): Path<String>,
    Json(payload): Json<EventData>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_service.update(&event_id, payload).await?;
    Ok(Json(to_view(&state, event).await?))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    info!("Admin deleting event {}", event_id);
    state.event_service.delete(&event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
