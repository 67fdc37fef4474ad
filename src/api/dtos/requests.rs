use crate::domain::models::registration::{Registrant, RegistrationFilter};
use crate::error::AppError;
use chrono::NaiveDate;
use serde::Deserialize;

/// Missing keys deserialize as empty strings so they are reported per field.
#[derive(Deserialize)]
pub struct CreateRegistrationRequest {
    #[serde(default)]
    pub event_id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub college: String,
    #[serde(default)]
    pub department: String,
}

impl CreateRegistrationRequest {
    pub fn into_parts(self) -> (String, Registrant) {
        let registrant = Registrant {
            full_name: self.full_name,
            email: self.email,
            college: self.college,
            department: self.department,
        };
        (self.event_id, registrant)
    }
}

#[derive(Deserialize, Default)]
pub struct RegistrationQuery {
    pub event_id: Option<String>,
    pub event_date: Option<String>,
}

impl RegistrationQuery {
    /// Blank parameters count as absent.
    pub fn into_filter(self) -> Result<RegistrationFilter, AppError> {
        let event_id = self.event_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());

        let event_date = match self.event_date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| AppError::Validation("Invalid date format (YYYY-MM-DD)".into()))?,
            ),
            _ => None,
        };

        Ok(RegistrationFilter { event_id, event_date })
    }
}

#[derive(Deserialize)]
pub struct UpdateSettingsRequest {
    #[serde(default)]
    pub admin_email: String,
    pub admin_notification_enabled: bool,
}
