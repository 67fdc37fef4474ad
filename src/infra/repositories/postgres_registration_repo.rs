use crate::domain::{
    models::{event::Capacity, registration::{InsertOutcome, Registration, RegistrationFilter, RegistrationListing}},
    ports::RegistrationRepository,
};
use crate::error::AppError;
use crate::infra::repositories::is_unique_violation;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresRegistrationRepo {
    pool: PgPool,
}

impl PostgresRegistrationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const FILTER_CLAUSE: &str = "($1::TEXT IS NULL OR r.event_id = $1) AND ($2::DATE IS NULL OR e.event_date = $2)";

#[async_trait]
impl RegistrationRepository for PostgresRegistrationRepo {
    async fn create(&self, registration: &Registration) -> Result<InsertOutcome, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Row lock on the event serialises concurrent inserts and capacity
        // edits for it until commit.
        let stored_capacity = sqlx::query_scalar::<_, Option<i32>>("SELECT capacity FROM events WHERE id = $1 FOR UPDATE")
            .bind(&registration.event_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::EventNotFound)?;

        if let Capacity::Limited(limit) = Capacity::from_column(stored_capacity) {
            let taken = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM registrations WHERE event_id = $1")
                .bind(&registration.event_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            if taken >= limit as i64 {
                return Ok(InsertOutcome::Full);
            }
        }

        let inserted = sqlx::query(
            "INSERT INTO registrations (id, event_id, full_name, email, college, department, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)"
        )
            .bind(&registration.id)
            .bind(&registration.event_id)
            .bind(&registration.full_name)
            .bind(&registration.email)
            .bind(&registration.college)
            .bind(&registration.department)
            .bind(registration.created_at)
            .execute(&mut *tx)
            .await;

        match inserted {
            Ok(_) => {
                tx.commit().await.map_err(AppError::Database)?;
                Ok(InsertOutcome::Inserted(registration.clone()))
            }
            Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::Duplicate),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    async fn exists_for(&self, email: &str, event_id: &str) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM registrations WHERE email = $1 AND event_id = $2)")
            .bind(email)
            .bind(event_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_for(&self, filter: &RegistrationFilter) -> Result<Vec<RegistrationListing>, AppError> {
        let sql = format!(
            r#"SELECT r.id, r.event_id, r.full_name, r.email, r.college, r.department, r.created_at,
                      e.name AS event_name, e.category, e.event_date
               FROM registrations r
               JOIN events e ON r.event_id = e.id
               WHERE {}
               ORDER BY r.created_at DESC"#,
            FILTER_CLAUSE
        );
        sqlx::query_as::<_, RegistrationListing>(&sql)
            .bind(&filter.event_id)
            .bind(filter.event_date)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count(&self, event_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM registrations WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_for(&self, filter: &RegistrationFilter) -> Result<i64, AppError> {
        let sql = format!(
            "SELECT COUNT(*) FROM registrations r JOIN events e ON r.event_id = e.id WHERE {}",
            FILTER_CLAUSE
        );
        sqlx::query_scalar::<_, i64>(&sql)
            .bind(&filter.event_id)
            .bind(filter.event_date)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM registrations WHERE id = $1")
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
