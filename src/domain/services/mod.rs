pub mod admission;
pub mod capacity;
pub mod eligibility;
pub mod event_service;
pub mod export;
pub mod notification;
