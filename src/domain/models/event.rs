use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Seat limit of an event. Stored as a nullable integer; NULL and any
/// non-positive value mean there is no limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    Unlimited,
    Limited(u32),
}

impl Capacity {
    pub fn from_column(value: Option<i32>) -> Self {
        match value {
            Some(n) if n > 0 => Capacity::Limited(n as u32),
            _ => Capacity::Unlimited,
        }
    }

    pub fn to_column(self) -> Option<i32> {
        match self {
            Capacity::Unlimited => None,
            Capacity::Limited(n) => Some(n as i32),
        }
    }

    pub fn availability(self, registered: i64) -> Availability {
        match self {
            Capacity::Unlimited => Availability::Unlimited,
            Capacity::Limited(n) => {
                let left = (n as i64 - registered).max(0);
                Availability::Seats(left as u32)
            }
        }
    }
}

/// Remaining space of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "seats", rename_all = "snake_case")]
pub enum Availability {
    Unlimited,
    Seats(u32),
}

impl Availability {
    pub fn has_space(self) -> bool {
        match self {
            Availability::Unlimited => true,
            Availability::Seats(n) => n > 0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub category: String,
    pub event_date: NaiveDate,
    pub registration_start: DateTime<Utc>,
    pub registration_end: DateTime<Utc>,
    pub capacity: Option<i32>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(data: EventData, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: data.name.trim().to_string(),
            category: data.category.trim().to_string(),
            event_date: data.event_date,
            registration_start: data.registration_start,
            registration_end: data.registration_end,
            capacity: Capacity::from_column(data.capacity).to_column(),
            active: data.active,
            created_at: now,
        }
    }

    /// Overwrites every editable field, keeping identity and creation time.
    pub fn apply(&mut self, data: EventData) {
        self.name = data.name.trim().to_string();
        self.category = data.category.trim().to_string();
        self.event_date = data.event_date;
        self.registration_start = data.registration_start;
        self.registration_end = data.registration_end;
        self.capacity = Capacity::from_column(data.capacity).to_column();
        self.active = data.active;
    }

    pub fn capacity(&self) -> Capacity {
        Capacity::from_column(self.capacity)
    }

    /// Inclusive on both ends.
    pub fn window_contains(&self, now: DateTime<Utc>) -> bool {
        self.registration_start <= now && now <= self.registration_end
    }

    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.active && self.window_contains(now)
    }
}

/// Administrator input for creating or replacing an event.
#[derive(Debug, Deserialize, Clone)]
pub struct EventData {
    pub name: String,
    pub category: String,
    pub event_date: NaiveDate,
    pub registration_start: DateTime<Utc>,
    pub registration_end: DateTime<Utc>,
    #[serde(default)]
    pub capacity: Option<i32>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl EventData {
    /// Returns every problem with the submitted data, empty when valid.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            problems.push("Event name is required.".to_string());
        } else if name.chars().count() > 255 {
            problems.push("Event name must not exceed 255 characters.".to_string());
        }

        let category = self.category.trim();
        if category.is_empty() {
            problems.push("Category is required.".to_string());
        } else if category.chars().count() > 255 {
            problems.push("Category must not exceed 255 characters.".to_string());
        }

        if self.registration_end <= self.registration_start {
            problems.push("Registration end date must be after registration start date.".to_string());
        }

        let event_start = self.event_date.and_time(chrono::NaiveTime::MIN).and_utc();
        if event_start <= self.registration_end {
            problems.push("Event date must be after registration end date.".to_string());
        }

        if let Some(capacity) = self.capacity
            && capacity < 0 {
            problems.push("Capacity must not be negative.".to_string());
        }

        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn data() -> EventData {
        EventData {
            name: "Rust Workshop".into(),
            category: "Workshop".into(),
            event_date: NaiveDate::from_ymd_opt(2026, 3, 20).unwrap(),
            registration_start: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
            registration_end: Utc.with_ymd_and_hms(2026, 3, 15, 18, 0, 0).unwrap(),
            capacity: Some(30),
            active: true,
        }
    }

    #[test]
    fn test_zero_and_missing_capacity_are_unlimited() {
        assert_eq!(Capacity::from_column(None), Capacity::Unlimited);
        assert_eq!(Capacity::from_column(Some(0)), Capacity::Unlimited);
        assert_eq!(Capacity::from_column(Some(-4)), Capacity::Unlimited);
        assert_eq!(Capacity::from_column(Some(12)), Capacity::Limited(12));
        assert!(Capacity::Unlimited.availability(1_000_000).has_space());
    }

    #[test]
    fn test_availability_never_goes_negative() {
        assert_eq!(Capacity::Limited(3).availability(1), Availability::Seats(2));
        assert_eq!(Capacity::Limited(3).availability(3), Availability::Seats(0));
        assert_eq!(Capacity::Limited(3).availability(7), Availability::Seats(0));
        assert!(!Capacity::Limited(3).availability(3).has_space());
    }

    #[test]
    fn test_window_is_inclusive() {
        let event = Event::new(data(), Utc::now());
        assert!(event.window_contains(event.registration_start));
        assert!(event.window_contains(event.registration_end));
        assert!(!event.window_contains(event.registration_start - Duration::seconds(1)));
        assert!(!event.window_contains(event.registration_end + Duration::seconds(1)));
    }

    #[test]
    fn test_new_event_stores_zero_capacity_as_null() {
        let mut d = data();
        d.capacity = Some(0);
        let event = Event::new(d, Utc::now());
        assert_eq!(event.capacity, None);
        assert_eq!(event.capacity(), Capacity::Unlimited);
    }

    #[test]
    fn test_event_data_date_invariants() {
        assert!(data().problems().is_empty());

        let mut reversed = data();
        reversed.registration_end = reversed.registration_start;
        assert!(reversed.problems().iter().any(|p| p.contains("Registration end")));

        let mut late_close = data();
        late_close.registration_end = Utc.with_ymd_and_hms(2026, 3, 20, 0, 0, 0).unwrap();
        assert!(late_close.problems().iter().any(|p| p.contains("Event date")));

        let mut blank = data();
        blank.name = "   ".into();
        blank.capacity = Some(-1);
        assert_eq!(blank.problems().len(), 2);
    }
}
