pub mod event;
pub mod export;
pub mod health;
pub mod registration;
pub mod settings;
