use crate::domain::models::{
    event::Event, settings::NotificationSettings,
    registration::{InsertOutcome, Registration, RegistrationFilter, RegistrationListing},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn list_active(&self) -> Result<Vec<Event>, AppError>;
    async fn list_all(&self) -> Result<Vec<Event>, AppError>;
    async fn list_by_category_and_date(&self, category: &str, date: NaiveDate) -> Result<Vec<Event>, AppError>;
    async fn categories(&self) -> Result<Vec<String>, AppError>;
    async fn dates_for_category(&self, category: &str) -> Result<Vec<NaiveDate>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;

    async fn is_registration_open(&self, id: &str, now: DateTime<Utc>) -> Result<bool, AppError> {
        Ok(self.find_by_id(id).await?.is_some_and(|e| e.is_open_at(now)))
    }
}

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Inserts unless the (event, email) pair exists or the event already
    /// holds as many registrations as its stored capacity. Both checks happen
    /// atomically with the write.
    async fn create(&self, registration: &Registration) -> Result<InsertOutcome, AppError>;
    async fn exists_for(&self, email: &str, event_id: &str) -> Result<bool, AppError>;
    async fn list_for(&self, filter: &RegistrationFilter) -> Result<Vec<RegistrationListing>, AppError>;
    async fn count(&self, event_id: &str) -> Result<i64, AppError>;
    async fn count_for(&self, filter: &RegistrationFilter) -> Result<i64, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get(&self) -> Result<NotificationSettings, AppError>;
    async fn save(&self, settings: &NotificationSettings) -> Result<NotificationSettings, AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError>;
}

/// Everything the mail templates need about one registration.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationParams {
    pub registration_id: String,
    pub full_name: String,
    pub email: String,
    pub college: String,
    pub department: String,
    pub event_name: String,
    pub category: String,
    pub event_date: NaiveDate,
}

impl NotificationParams {
    pub fn new(event: &Event, registration: &Registration) -> Self {
        Self {
            registration_id: registration.id.clone(),
            full_name: registration.full_name.clone(),
            email: registration.email.clone(),
            college: registration.college.clone(),
            department: registration.department.clone(),
            event_name: event.name.clone(),
            category: event.category.clone(),
            event_date: event.event_date,
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_registrant_confirmation(&self, params: &NotificationParams) -> Result<(), AppError>;
    async fn send_admin_notification(&self, recipient: &str, params: &NotificationParams) -> Result<(), AppError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
