use std::sync::{Arc, LazyLock};
use regex::Regex;
use crate::domain::{
    models::{
        admission::{AdmissionDecision, Field, FieldError, Reason},
        event::Event,
        registration::Registrant,
    },
    ports::{Clock, RegistrationRepository},
    services::capacity::CapacityChecker,
};
use crate::error::AppError;

const MIN_TEXT_LEN: usize = 2;
const MAX_TEXT_LEN: usize = 255;
const MAX_EMAIL_LEN: usize = 254;

// Letters in any script, whitespace, hyphens, apostrophes and periods:
// "O'Brien", "Jean-Paul", "José García", "St. Xavier's".
static TEXT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}\s\-'.]+$").expect("text field pattern compiles")
});

/// Checks a free-text field after trimming. Returns the error, if any.
pub fn validate_text_field(value: &str, field: Field) -> Option<FieldError> {
    let value = value.trim();
    let len = value.chars().count();

    if len < MIN_TEXT_LEN {
        return Some(FieldError::new(
            field,
            Reason::TooShort,
            format!("{} must be at least {} characters long.", field.label(), MIN_TEXT_LEN),
        ));
    }
    if len > MAX_TEXT_LEN {
        return Some(FieldError::new(
            field,
            Reason::TooLong,
            format!("{} must not exceed {} characters.", field.label(), MAX_TEXT_LEN),
        ));
    }
    if !TEXT_PATTERN.is_match(value) {
        return Some(FieldError::new(
            field,
            Reason::InvalidCharacters,
            format!("{} must contain only letters, spaces, hyphens, apostrophes, and periods.", field.label()),
        ));
    }
    None
}

pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 3 || email.len() > MAX_EMAIL_LEN {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }

    let local_ok = local.chars().all(|c| {
        c.is_ascii_alphanumeric() || "!#$%&'*+/=?^_`{|}~.-".contains(c)
    });
    if !local_ok || local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

/// Presence checks alone. Also used by the admission service when the
/// event reference itself is missing.
pub fn missing_fields(registrant: &Registrant, event_reference: &str) -> Vec<Field> {
    [
        (Field::FullName, registrant.full_name.as_str()),
        (Field::Email, registrant.email.as_str()),
        (Field::College, registrant.college.as_str()),
        (Field::Department, registrant.department.as_str()),
        (Field::EventId, event_reference),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(field, _)| field)
    .collect()
}

pub struct EligibilityValidator {
    registrations: Arc<dyn RegistrationRepository>,
    capacity: CapacityChecker,
    clock: Arc<dyn Clock>,
}

impl EligibilityValidator {
    pub fn new(registrations: Arc<dyn RegistrationRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            capacity: CapacityChecker::new(registrations.clone()),
            registrations,
            clock,
        }
    }

    /// Runs every check and collects all failures rather than stopping at
    /// the first one. A missing field skips only the checks that need it.
    pub async fn validate(&self, event: &Event, registrant: &Registrant) -> Result<AdmissionDecision, AppError> {
        let mut decision = AdmissionDecision::default();
        let missing = missing_fields(registrant, &event.id);
        for field in &missing {
            decision.push(FieldError::required(*field));
        }

        let text_fields = [
            (Field::FullName, &registrant.full_name),
            (Field::College, &registrant.college),
            (Field::Department, &registrant.department),
        ];
        for (field, value) in text_fields {
            if missing.contains(&field) {
                continue;
            }
            if let Some(error) = validate_text_field(value, field) {
                decision.push(error);
            }
        }

        if !missing.contains(&Field::Email) {
            let email = registrant.normalized_email();
            if !is_valid_email(&email) {
                decision.push(FieldError::new(Field::Email, Reason::InvalidEmail, "Please enter a valid email address."));
            }
            if self.registrations.exists_for(&email, &event.id).await? {
                decision.push(FieldError::duplicate());
            }
        }

        if !event.active {
            decision.push(FieldError::event_inactive());
        } else if !event.window_contains(self.clock.now()) {
            decision.push(FieldError::registration_closed());
        }

        if !self.capacity.has_space(event).await? {
            decision.push(FieldError::capacity_exceeded());
        }

        Ok(decision)
    }
}
