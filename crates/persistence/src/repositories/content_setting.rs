//! Content settings key/value repository.

use sqlx::PgPool;

use crate::entities::ContentSettingEntity;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct ContentSettingRepository {
    pool: PgPool,
}

impl ContentSettingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, key: &str) -> Result<Option<ContentSettingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("get_content_setting");
        let result = sqlx::query_as::<_, ContentSettingEntity>(
            "SELECT id, key, value, created_at, updated_at FROM content_settings WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Insert or overwrite a setting.
    pub async fn upsert(&self, key: &str, value: &str) -> Result<ContentSettingEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_content_setting");
        let result = sqlx::query_as::<_, ContentSettingEntity>(
            r#"
            INSERT INTO content_settings (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
            RETURNING id, key, value, created_at, updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .fetch_one(&self.pool)
        .await;
        timer.finish(result)
    }
}
