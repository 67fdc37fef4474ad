pub mod admission;
pub mod event;
pub mod registration;
pub mod settings;
