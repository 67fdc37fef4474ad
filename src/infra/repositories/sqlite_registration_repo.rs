use crate::domain::{
    models::{registration::{InsertOutcome, Registration, RegistrationFilter, RegistrationListing}},
    ports::RegistrationRepository,
};
use crate::error::AppError;
use crate::infra::repositories::is_unique_violation;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteRegistrationRepo {
    pool: SqlitePool,
}

impl SqliteRegistrationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const LISTING_SELECT: &str = r#"
    SELECT r.id, r.event_id, r.full_name, r.email, r.college, r.department, r.created_at,
           e.name AS event_name, e.category, e.event_date
    FROM registrations r
    JOIN events e ON r.event_id = e.id
    WHERE (?1 IS NULL OR r.event_id = ?1) AND (?2 IS NULL OR e.event_date = ?2)
"#;

#[async_trait]
impl RegistrationRepository for SqliteRegistrationRepo {
    async fn create(&self, registration: &Registration) -> Result<InsertOutcome, AppError> {
        // One statement: SQLite holds the write lock while it reads the stored
        // capacity and counts, so neither can change before the insert lands.
        // NULL or non-positive capacity means unlimited.
        let result = sqlx::query(
            r#"INSERT INTO registrations (id, event_id, full_name, email, college, department, created_at)
               SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7
               FROM events e
               WHERE e.id = ?2
                 AND (e.capacity IS NULL OR e.capacity <= 0
                      OR (SELECT COUNT(*) FROM registrations WHERE event_id = ?2) < e.capacity)"#
        )
            .bind(&registration.id)
            .bind(&registration.event_id)
            .bind(&registration.full_name)
            .bind(&registration.email)
            .bind(&registration.college)
            .bind(&registration.department)
            .bind(registration.created_at)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => {
                let event_exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM events WHERE id = ?)")
                    .bind(&registration.event_id)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(AppError::Database)?;
                if event_exists {
                    Ok(InsertOutcome::Full)
                } else {
                    Err(AppError::EventNotFound)
                }
            }
            Ok(_) => Ok(InsertOutcome::Inserted(registration.clone())),
            Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::Duplicate),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    async fn exists_for(&self, email: &str, event_id: &str) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM registrations WHERE email = ? AND event_id = ?)")
            .bind(email)
            .bind(event_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_for(&self, filter: &RegistrationFilter) -> Result<Vec<RegistrationListing>, AppError> {
        let sql = format!("{} ORDER BY r.created_at DESC", LISTING_SELECT);
        sqlx::query_as::<_, RegistrationListing>(&sql)
            .bind(&filter.event_id)
            .bind(filter.event_date)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count(&self, event_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM registrations WHERE event_id = ?")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_for(&self, filter: &RegistrationFilter) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM registrations r
               JOIN events e ON r.event_id = e.id
               WHERE (?1 IS NULL OR r.event_id = ?1) AND (?2 IS NULL OR e.event_date = ?2)"#
        )
            .bind(&filter.event_id)
            .bind(filter.event_date)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM registrations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Registration not found".into()));
        }
        Ok(())
    }
}
