use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, Default, PartialEq, Eq)]
pub struct NotificationSettings {
    pub admin_email: String,
    pub admin_notification_enabled: bool,
}

impl NotificationSettings {
    /// Address the admin copy goes to, if the feature is on and configured.
    pub fn admin_recipient(&self) -> Option<&str> {
        let email = self.admin_email.trim();
        if self.admin_notification_enabled && !email.is_empty() {
            Some(email)
        } else {
            None
        }
    }
}
