use event_registration::{
    api::router::create_router,
    state::AppState,
    config::Config,
    domain::models::event::{Event, EventData},
    domain::ports::{Clock, EmailService},
    domain::services::notification::MailNotifier,
    infra::factory::{assemble_state, load_templates},
    infra::repositories::{
        sqlite_event_repo::SqliteEventRepo,
        sqlite_registration_repo::SqliteRegistrationRepo,
        sqlite_settings_repo::SqliteSettingsRepo,
    },
    error::AppError,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, header},
    response::Response,
    Router,
};
use std::str::FromStr;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tower::ServiceExt;
use serde_json::Value;

pub const ADMIN_KEY: &str = "test-admin-key";

#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct SentMail {
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
}

/// Records every mail and fails for recipients listed in `failing`.
#[derive(Default)]
pub struct MockEmailService {
    pub sent: Mutex<Vec<SentMail>>,
    failing: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl MockEmailService {
    pub fn fail_for(&self, recipient: &str) {
        self.failing.lock().unwrap().push(recipient.to_string());
    }

    pub fn sent_to(&self, recipient: &str) -> Vec<SentMail> {
        self.sent.lock().unwrap().iter()
            .filter(|m| m.recipient == recipient)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError> {
        if self.failing.lock().unwrap().iter().any(|r| r == recipient) {
            return Err(AppError::Notification(format!("mock gateway refused {}", recipient)));
        }
        self.sent.lock().unwrap().push(SentMail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        });
        Ok(())
    }
}

pub struct FixedClock(Mutex<DateTime<Utc>>);

#[allow(dead_code)]
impl FixedClock {
    pub fn set(&self, now: DateTime<Utc>) {
        *self.0.lock().unwrap() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub email: Arc<MockEmailService>,
    pub clock: Arc<FixedClock>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(StdDuration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            mail_from_alias: "events".to_string(),
            mail_timeout: StdDuration::from_secs(2),
            admin_api_key: ADMIN_KEY.to_string(),
        };

        let email = Arc::new(MockEmailService::default());
        let clock = Arc::new(FixedClock(Mutex::new(Self::start_time())));
        let templates = Arc::new(load_templates().expect("Failed to load templates"));
        let notifier = Arc::new(MailNotifier::new(email.clone(), templates, config.mail_timeout));

        let state = Arc::new(assemble_state(
            config,
            Arc::new(SqliteEventRepo::new(pool.clone())),
            Arc::new(SqliteRegistrationRepo::new(pool.clone())),
            Arc::new(SqliteSettingsRepo::new(pool.clone())),
            notifier,
            clock.clone(),
        ));

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            email,
            clock,
        }
    }

    /// The clock every test starts at: 2026-03-01 10:00 UTC.
    pub fn start_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap()
    }

    /// Window opened a day ago, closes in a week, event in two weeks.
    pub fn open_event_data(name: &str, capacity: Option<i32>) -> EventData {
        let now = Self::start_time();
        EventData {
            name: name.to_string(),
            category: "Workshop".to_string(),
            event_date: (now + Duration::days(14)).date_naive(),
            registration_start: now - Duration::days(1),
            registration_end: now + Duration::days(7),
            capacity,
            active: true,
        }
    }

    pub async fn seed_event(&self, name: &str, capacity: Option<i32>) -> Event {
        self.state.event_service
            .create(Self::open_event_data(name, capacity))
            .await
            .expect("Failed to seed event")
    }

    pub async fn registration_count(&self, event_id: &str) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM registrations WHERE event_id = ?")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    pub async fn send(&self, method: &str, uri: &str, admin: bool, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if admin {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_KEY));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    pub async fn register(&self, event_id: &str, full_name: &str, email: &str) -> Response {
        let payload = serde_json::json!({
            "event_id": event_id,
            "full_name": full_name,
            "email": email,
            "college": "Imperial College",
            "department": "Computer Science"
        });
        self.send("POST", "/api/v1/registrations", false, Some(payload)).await
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
