use std::sync::Arc;
use tracing::{debug, error, info, warn};
use crate::domain::{
    models::{
        admission::{AdmissionDecision, FieldError},
        event::Event,
        registration::{InsertOutcome, Registrant, Registration, RegistrationOutcome},
    },
    ports::{Clock, EventRepository, NotificationParams, Notifier, RegistrationRepository, SettingsRepository},
    services::eligibility::{missing_fields, EligibilityValidator},
};
use crate::error::AppError;

/// Validates, persists and notifies for a single registration attempt.
pub struct AdmissionService {
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    settings: Arc<dyn SettingsRepository>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    validator: EligibilityValidator,
}

impl AdmissionService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        registrations: Arc<dyn RegistrationRepository>,
        settings: Arc<dyn SettingsRepository>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let validator = EligibilityValidator::new(registrations.clone(), clock.clone());
        Self { events, registrations, settings, notifier, clock, validator }
    }

    pub async fn register(&self, event_id: &str, registrant: Registrant) -> Result<RegistrationOutcome, AppError> {
        let event_id = event_id.trim();
        if event_id.is_empty() {
            let mut decision = AdmissionDecision::default();
            for field in missing_fields(&registrant, event_id) {
                decision.push(FieldError::required(field));
            }
            return Err(AppError::ValidationFailed(decision));
        }

        let event = self.events.find_by_id(event_id).await?
            .filter(|e| e.active)
            .ok_or(AppError::EventNotFound)?;

        let decision = self.validator.validate(&event, &registrant).await?;
        if !decision.is_admissible() {
            return Err(AppError::ValidationFailed(decision));
        }

        let registration = Registration::new(event.id.clone(), &registrant, self.clock.now());
        let created = match self.registrations.create(&registration).await {
            Ok(InsertOutcome::Inserted(created)) => created,
            Ok(InsertOutcome::Duplicate) => {
                debug!("Concurrent duplicate registration for event {}", event.id);
                return Err(AppError::ValidationFailed(AdmissionDecision::rejected(FieldError::duplicate())));
            }
            Ok(InsertOutcome::Full) => {
                debug!("Event {} filled up before insert", event.id);
                return Err(AppError::ValidationFailed(AdmissionDecision::rejected(FieldError::capacity_exceeded())));
            }
            Err(e) => {
                error!(event_id = %event.id, email = %registration.email, "Failed to persist registration: {}", e);
                return Err(e);
            }
        };

        info!(registration_id = %created.id, event_id = %event.id, "Registration created");

        let params = NotificationParams::new(&event, &created);
        let outcome = match self.notifier.send_registrant_confirmation(&params).await {
            Ok(()) => {
                info!(registration_id = %created.id, "Confirmation email sent to {}", created.email);
                RegistrationOutcome::Confirmed(created)
            }
            Err(e) => {
                error!(
                    registration_id = %created.id,
                    event_id = %event.id,
                    email = %created.email,
                    "Failed to send registrant confirmation: {}", e
                );
                RegistrationOutcome::ConfirmationUndeliverable(created)
            }
        };

        self.notify_admin(&event, &params).await;

        Ok(outcome)
    }

    async fn notify_admin(&self, event: &Event, params: &NotificationParams) {
        let settings = match self.settings.get().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!(event_id = %event.id, "Could not load notification settings: {}", e);
                return;
            }
        };

        let Some(recipient) = settings.admin_recipient() else {
            return;
        };

        match self.notifier.send_admin_notification(recipient, params).await {
            Ok(()) => info!(event_id = %event.id, "Admin notification sent to {}", recipient),
            Err(e) => warn!(event_id = %event.id, "Failed to send admin notification to {}: {}", recipient, e),
        }
    }
}
