use crate::domain::{models::settings::NotificationSettings, ports::SettingsRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresSettingsRepo {
    pool: PgPool,
}

impl PostgresSettingsRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for PostgresSettingsRepo {
    async fn get(&self) -> Result<NotificationSettings, AppError> {
        let settings = sqlx::query_as::<_, NotificationSettings>(
            "SELECT admin_email, admin_notification_enabled FROM settings WHERE id = 1",
        )
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(settings.unwrap_or_default())
    }

    async fn save(&self, settings: &NotificationSettings) -> Result<NotificationSettings, AppError> {
        sqlx::query_as::<_, NotificationSettings>(
            r#"INSERT INTO settings (id, admin_email, admin_notification_enabled) VALUES (1, $1, $2)
               ON CONFLICT (id) DO UPDATE SET
                   admin_email = EXCLUDED.admin_email,
                   admin_notification_enabled = EXCLUDED.admin_notification_enabled
               RETURNING admin_email, admin_notification_enabled"#
        )
            .bind(&settings.admin_email)
            .bind(settings.admin_notification_enabled)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
