use std::sync::Arc;
use crate::domain::{
    models::event::{Availability, Capacity, Event},
    ports::RegistrationRepository,
};
use crate::error::AppError;

/// Answers "is there still room" for an event. Read-only.
pub struct CapacityChecker {
    registrations: Arc<dyn RegistrationRepository>,
}

impl CapacityChecker {
    pub fn new(registrations: Arc<dyn RegistrationRepository>) -> Self {
        Self { registrations }
    }

    pub async fn remaining(&self, event: &Event) -> Result<Availability, AppError> {
        match event.capacity() {
            Capacity::Unlimited => Ok(Availability::Unlimited),
            limited => {
                let count = self.registrations.count(&event.id).await?;
                Ok(limited.availability(count))
            }
        }
    }

    pub async fn has_space(&self, event: &Event) -> Result<bool, AppError> {
        Ok(self.remaining(event).await?.has_space())
    }
}
