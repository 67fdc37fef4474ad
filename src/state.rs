use std::sync::Arc;
use crate::domain::ports::{Clock, EventRepository, RegistrationRepository, SettingsRepository};
use crate::domain::services::{admission::AdmissionService, capacity::CapacityChecker, event_service::EventService};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub event_repo: Arc<dyn EventRepository>,
    pub registration_repo: Arc<dyn RegistrationRepository>,
    pub settings_repo: Arc<dyn SettingsRepository>,
    pub clock: Arc<dyn Clock>,
    pub admission_service: Arc<AdmissionService>,
    pub event_service: Arc<EventService>,
    pub capacity_checker: Arc<CapacityChecker>,
}
