use std::sync::Arc;
use tracing::info;
use crate::domain::{
    models::event::{Capacity, Event, EventData},
    ports::{Clock, EventRepository, RegistrationRepository},
};
use crate::error::AppError;

pub struct EventService {
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    clock: Arc<dyn Clock>,
}

impl EventService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        registrations: Arc<dyn RegistrationRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { events, registrations, clock }
    }

    pub async fn create(&self, data: EventData) -> Result<Event, AppError> {
        check(&data)?;
        let event = Event::new(data, self.clock.now());
        let created = self.events.create(&event).await?;
        info!("Event created: {} (ID: {})", created.name, created.id);
        Ok(created)
    }

    /// Replaces the editable fields. Capacity may not drop below the number
    /// of registrations already taken.
    pub async fn update(&self, id: &str, data: EventData) -> Result<Event, AppError> {
        check(&data)?;
        let mut event = self.events.find_by_id(id).await?
            .ok_or(AppError::EventNotFound)?;

        if let Capacity::Limited(limit) = Capacity::from_column(data.capacity) {
            let taken = self.registrations.count(id).await?;
            if taken > limit as i64 {
                return Err(AppError::Conflict(format!(
                    "Capacity {} is below the {} registrations already taken",
                    limit, taken
                )));
            }
        }

        event.apply(data);
        let updated = self.events.update(&event).await?;
        info!("Event updated: ID {}", updated.id);
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.events.delete(id).await?;
        info!("Event deleted: ID {}", id);
        Ok(())
    }
}

fn check(data: &EventData) -> Result<(), AppError> {
    let problems = data.problems();
    if problems.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(problems.join(" ")))
    }
}
