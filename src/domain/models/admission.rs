use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FullName,
    Email,
    College,
    Department,
    EventId,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::FullName => "Full Name",
            Field::Email => "Email",
            Field::College => "College Name",
            Field::Department => "Department",
            Field::EventId => "Event",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    Required,
    TooShort,
    TooLong,
    InvalidCharacters,
    InvalidEmail,
    Duplicate,
    RegistrationClosed,
    EventInactive,
    CapacityExceeded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub reason: Reason,
    pub message: String,
}

impl FieldError {
    pub fn new(field: Field, reason: Reason, message: impl Into<String>) -> Self {
        Self { field, reason, message: message.into() }
    }

    pub fn required(field: Field) -> Self {
        Self::new(field, Reason::Required, format!("{} is required.", field.label()))
    }

    pub fn duplicate() -> Self {
        Self::new(Field::Email, Reason::Duplicate, "You have already registered for this event.")
    }

    pub fn registration_closed() -> Self {
        Self::new(Field::EventId, Reason::RegistrationClosed, "Registration is not currently open for this event.")
    }

    pub fn event_inactive() -> Self {
        Self::new(Field::EventId, Reason::EventInactive, "This event is not accepting registrations.")
    }

    pub fn capacity_exceeded() -> Self {
        Self::new(Field::EventId, Reason::CapacityExceeded, "This event is full.")
    }
}

/// Outcome of validating one registration attempt. Admissible iff no errors
/// were collected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdmissionDecision {
    errors: Vec<FieldError>,
}

impl AdmissionDecision {
    pub fn rejected(error: FieldError) -> Self {
        Self { errors: vec![error] }
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn is_admissible(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn has_error(&self, field: Field) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn has_reason(&self, reason: Reason) -> bool {
        self.errors.iter().any(|e| e.reason == reason)
    }

    pub fn is_duplicate(&self) -> bool {
        self.has_reason(Reason::Duplicate)
    }

    pub fn is_capacity_exceeded(&self) -> bool {
        self.has_reason(Reason::CapacityExceeded)
    }
}

impl fmt::Display for AdmissionDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join(" "))
    }
}
