use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Registration {
    pub id: String,
    pub event_id: String,
    pub full_name: String,
    pub email: String,
    pub college: String,
    pub department: String,
    pub created_at: DateTime<Utc>,
}

/// A registration attempt as submitted. Blank fields are reported as missing
/// by the eligibility validator.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Registrant {
    pub full_name: String,
    pub email: String,
    pub college: String,
    pub department: String,
}

impl Registrant {
    pub fn normalized_email(&self) -> String {
        normalize_email(&self.email)
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Registration {
    pub fn new(event_id: String, registrant: &Registrant, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            full_name: registrant.full_name.trim().to_string(),
            email: registrant.normalized_email(),
            college: registrant.college.trim().to_string(),
            department: registrant.department.trim().to_string(),
            created_at,
        }
    }
}

/// Registration joined with the event it belongs to.
#[derive(Debug, Serialize, FromRow, Clone)]
pub struct RegistrationListing {
    pub id: String,
    pub event_id: String,
    pub full_name: String,
    pub email: String,
    pub college: String,
    pub department: String,
    pub created_at: DateTime<Utc>,
    pub event_name: String,
    pub category: String,
    pub event_date: NaiveDate,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RegistrationFilter {
    pub event_id: Option<String>,
    pub event_date: Option<NaiveDate>,
}

/// Result of the guarded insert. `Duplicate` and `Full` mean the row was not
/// written.
#[derive(Debug)]
pub enum InsertOutcome {
    Inserted(Registration),
    Duplicate,
    Full,
}

/// What `register` reports back once the row is persisted.
#[derive(Debug)]
pub enum RegistrationOutcome {
    Confirmed(Registration),
    ConfirmationUndeliverable(Registration),
}

impl RegistrationOutcome {
    pub fn into_registration(self) -> Registration {
        match self {
            RegistrationOutcome::Confirmed(r) | RegistrationOutcome::ConfirmationUndeliverable(r) => r,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, RegistrationOutcome::Confirmed(_))
    }
}
