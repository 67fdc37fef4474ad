pub mod sqlite_event_repo;
pub mod sqlite_registration_repo;
pub mod sqlite_settings_repo;

pub mod postgres_event_repo;
pub mod postgres_registration_repo;
pub mod postgres_settings_repo;

/// 2067 = SQLite unique constraint, 23505 = PostgreSQL unique violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}
