use crate::domain::{models::settings::NotificationSettings, ports::SettingsRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteSettingsRepo {
    pool: SqlitePool,
}

impl SqliteSettingsRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for SqliteSettingsRepo {
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
            r#"INSERT INTO settings (id, admin_email, admin_notification_enabled) VALUES (1, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
                   admin_email = excluded.admin_email,
                   admin_notification_enabled = excluded.admin_notification_enabled
               RETURNING admin_email, admin_notification_enabled"#
        )
            .bind(&settings.admin_email)
            .bind(settings.admin_notification_enabled)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
