use crate::domain::ports::EmailService;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Posts mails as JSON to an HTTP mail gateway.
pub struct HttpEmailService {
    client: Client,
    api_url: String,
    api_key: String,
    from_alias: String,
}

impl HttpEmailService {
    pub fn new(api_url: String, api_key: String, from_alias: String, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::InternalWithMsg(format!("Failed to build mail client: {}", e)))?;
        Ok(Self { client, api_url, api_key, from_alias })
    }
}

#[derive(Serialize)]
struct EmailPayload<'a> {
    from_alias: &'a str,
    to_addr: &'a str,
    subject: &'a str,
    html_body: &'a str,
}

#[async_trait]
impl EmailService for HttpEmailService {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError> {
        let payload = EmailPayload {
            from_alias: &self.from_alias,
            to_addr: recipient,
            subject,
            html_body,
        };

        let res = self.client.post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Notification(format!("Email service connection error: {}", e)))?;

        // Callers decide how loudly a failed send is reported.
        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            debug!(%status, "Mail gateway rejected message to {}", recipient);
            return Err(AppError::Notification(format!("Email service failed. Status: {}, Body: {}", status, text)));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{NotificationParams, Notifier};
    use crate::domain::services::notification::MailNotifier;
    use crate::infra::factory::load_templates;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::{Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct ErrorCounter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for ErrorCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::ERROR {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn service(server: &MockServer) -> HttpEmailService {
        HttpEmailService::new(
            format!("{}/api/v1/send", server.uri()),
            "secret-token".to_string(),
            "events".to_string(),
            Duration::from_secs(2),
        ).unwrap()
    }

    #[tokio::test]
    async fn test_posts_payload_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/send"))
            .and(header("Authorization", "Bearer secret-token"))
            .and(body_json(serde_json::json!({
                "from_alias": "events",
                "to_addr": "ada@example.com",
                "subject": "Registration Confirmed: Demo",
                "html_body": "<p>hi</p>"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        service(&server)
            .send("ada@example.com", "Registration Confirmed: Demo", "<p>hi</p>")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_gateway_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("mailbox on fire"))
            .mount(&server)
            .await;

        let err = service(&server).send("ada@example.com", "s", "b").await.unwrap_err();
        match err {
            AppError::Notification(msg) => assert!(msg.contains("503") && msg.contains("mailbox on fire")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_admin_copy_emits_no_error_events() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let errors = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(ErrorCounter(errors.clone()));
        let _guard = tracing::subscriber::set_default(subscriber);

        let notifier = MailNotifier::new(
            Arc::new(service(&server)),
            Arc::new(load_templates().unwrap()),
            Duration::from_secs(2),
        );
        let params = NotificationParams {
            registration_id: "r-1".into(),
            full_name: "Grace Hopper".into(),
            email: "grace@example.com".into(),
            college: "Vassar".into(),
            department: "Mathematics".into(),
            event_name: "Compiler Night".into(),
            category: "Technical".into(),
            event_date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
        };

        let result = notifier.send_admin_notification("admin@example.com", &params).await;

        assert!(matches!(result, Err(AppError::Notification(_))));
        assert_eq!(errors.load(Ordering::SeqCst), 0);
    }
}
