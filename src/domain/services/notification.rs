use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use tera::{Context, Tera};
use tracing::debug;
use crate::domain::ports::{EmailService, NotificationParams, Notifier};
use crate::error::AppError;

pub const CONFIRMATION_TEMPLATE: &str = "registrant_confirmation.html";
pub const ADMIN_TEMPLATE: &str = "admin_notification.html";

/// Renders the registration mails and hands them to the email transport,
/// giving up after `timeout`.
pub struct MailNotifier {
    email: Arc<dyn EmailService>,
    templates: Arc<Tera>,
    timeout: Duration,
}

impl MailNotifier {
    pub fn new(email: Arc<dyn EmailService>, templates: Arc<Tera>, timeout: Duration) -> Self {
        Self { email, templates, timeout }
    }

    fn render(&self, template_name: &str, params: &NotificationParams) -> Result<String, AppError> {
        let context = Context::from_serialize(params)
            .map_err(|e| AppError::InternalWithMsg(format!("Template context error: {}", e)))?;
        self.templates.render(template_name, &context)
            .map_err(|e| AppError::InternalWithMsg(format!("Template render error ({}): {}", template_name, e)))
    }

    async fn deliver(&self, recipient: &str, subject: &str, body: &str) -> Result<(), AppError> {
        debug!("Sending '{}' to {}", subject, recipient);
        match tokio::time::timeout(self.timeout, self.email.send(recipient, subject, body)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Notification(format!(
                "Mail delivery to {} timed out after {}s",
                recipient,
                self.timeout.as_secs()
            ))),
        }
    }
}

#[async_trait]
impl Notifier for MailNotifier {
    async fn send_registrant_confirmation(&self, params: &NotificationParams) -> Result<(), AppError> {
        let body = self.render(CONFIRMATION_TEMPLATE, params)?;
        let subject = format!("Registration Confirmed: {}", params.event_name);
        self.deliver(&params.email, &subject, &body).await
    }

    async fn send_admin_notification(&self, recipient: &str, params: &NotificationParams) -> Result<(), AppError> {
        let body = self.render(ADMIN_TEMPLATE, params)?;
        let subject = format!("New Registration: {}", params.event_name);
        self.deliver(recipient, &subject, &body).await
    }
}
