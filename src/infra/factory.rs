use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use thiserror::Error;
use tracing::info;
use tracing::log::LevelFilter;
use tera::Tera;

use crate::config::Config;
use crate::state::AppState;
use crate::error::AppError;
use crate::domain::ports::{Clock, EventRepository, Notifier, RegistrationRepository, SettingsRepository};
use crate::domain::services::{
    admission::AdmissionService,
    capacity::CapacityChecker,
    event_service::EventService,
    notification::{MailNotifier, ADMIN_TEMPLATE, CONFIRMATION_TEMPLATE},
};
use crate::infra::clock::SystemClock;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::repositories::{
    postgres_event_repo::PostgresEventRepo, postgres_registration_repo::PostgresRegistrationRepo,
    postgres_settings_repo::PostgresSettingsRepo,
    sqlite_event_repo::SqliteEventRepo, sqlite_registration_repo::SqliteRegistrationRepo,
    sqlite_settings_repo::SqliteSettingsRepo,
};

#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Invalid database URL: {0}")]
    DatabaseUrl(sqlx::Error),
    #[error("Failed to connect to database: {0}")]
    Connect(sqlx::Error),
    #[error("Failed to run migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("Failed to load mail templates: {0}")]
    Templates(#[from] tera::Error),
    #[error("Failed to set up mail transport: {0}")]
    Mail(AppError),
}

pub fn load_templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_template(CONFIRMATION_TEMPLATE, include_str!("../templates/registrant_confirmation.html"))?;
    tera.add_raw_template(ADMIN_TEMPLATE, include_str!("../templates/admin_notification.html"))?;
    Ok(tera)
}

/// Wires the services on top of already-built collaborators.
pub fn assemble_state(
    config: Config,
    event_repo: Arc<dyn EventRepository>,
    registration_repo: Arc<dyn RegistrationRepository>,
    settings_repo: Arc<dyn SettingsRepository>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
) -> AppState {
    let admission_service = Arc::new(AdmissionService::new(
        event_repo.clone(),
        registration_repo.clone(),
        settings_repo.clone(),
        notifier,
        clock.clone(),
    ));
    let event_service = Arc::new(EventService::new(event_repo.clone(), registration_repo.clone(), clock.clone()));
    let capacity_checker = Arc::new(CapacityChecker::new(registration_repo.clone()));

    AppState {
        config,
        event_repo,
        registration_repo,
        settings_repo,
        clock,
        admission_service,
        event_service,
        capacity_checker,
    }
}

pub async fn bootstrap_state(config: &Config) -> Result<AppState, BootstrapError> {
    let database_url = &config.database_url;

    let email_service = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
        config.mail_from_alias.clone(),
        config.mail_timeout,
    ).map_err(BootstrapError::Mail)?);
    let templates = Arc::new(load_templates()?);
    let notifier: Arc<dyn Notifier> = Arc::new(MailNotifier::new(email_service, templates, config.mail_timeout));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let opts: PgConnectOptions = database_url.parse().map_err(BootstrapError::DatabaseUrl)?;
        let opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .map_err(BootstrapError::Connect)?;

        run_postgres_migrations(&pool).await?;

        Ok(assemble_state(
            config.clone(),
            Arc::new(PostgresEventRepo::new(pool.clone())),
            Arc::new(PostgresRegistrationRepo::new(pool.clone())),
            Arc::new(PostgresSettingsRepo::new(pool)),
            notifier,
            clock,
        ))
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .map_err(BootstrapError::DatabaseUrl)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .map_err(BootstrapError::Connect)?;

        run_sqlite_migrations(&pool).await?;

        Ok(assemble_state(
            config.clone(),
            Arc::new(SqliteEventRepo::new(pool.clone())),
            Arc::new(SqliteRegistrationRepo::new(pool.clone())),
            Arc::new(SqliteSettingsRepo::new(pool)),
            notifier,
            clock,
        ))
    }
}

async fn run_postgres_migrations(pool: &PgPool) -> Result<(), BootstrapError> {
    sqlx::migrate!("./migrations/postgres").run(pool).await?;
    Ok(())
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<(), BootstrapError> {
    sqlx::migrate!("./migrations/sqlite").run(pool).await?;
    Ok(())
}
