use crate::domain::models::{
    event::{Availability, Event},
    registration::{RegistrationListing, RegistrationOutcome},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Event as shown to clients, with the live seat situation.
#[derive(Serialize)]
pub struct EventView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub event_date: NaiveDate,
    pub registration_start: DateTime<Utc>,
    pub registration_end: DateTime<Utc>,
    pub capacity: Option<i32>,
    pub active: bool,
    pub availability: Availability,
    pub registration_open: bool,
}

impl EventView {
    pub fn new(event: Event, availability: Availability, now: DateTime<Utc>) -> Self {
        let registration_open = event.is_open_at(now) && availability.has_space();
        Self {
            id: event.id,
            name: event.name,
            category: event.category,
            event_date: event.event_date,
            registration_start: event.registration_start,
            registration_end: event.registration_end,
            capacity: event.capacity,
            active: event.active,
            availability,
            registration_open,
        }
    }
}

#[derive(Serialize)]
pub struct RegistrationCreatedResponse {
    pub registration_id: String,
    pub event_id: String,
    pub confirmation: &'static str,
    pub message: &'static str,
}

impl From<RegistrationOutcome> for RegistrationCreatedResponse {
    fn from(outcome: RegistrationOutcome) -> Self {
        let (confirmation, message) = if outcome.is_confirmed() {
            ("SENT", "Registration successful. A confirmation email has been sent.")
        } else {
            ("UNDELIVERABLE", "Registration successful, but the confirmation email could not be delivered.")
        };
        let registration = outcome.into_registration();
        Self {
            registration_id: registration.id,
            event_id: registration.event_id,
            confirmation,
            message,
        }
    }
}

#[derive(Serialize)]
pub struct RegistrationListResponse {
    pub total: i64,
    pub registrations: Vec<RegistrationListing>,
}
