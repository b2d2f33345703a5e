//! Content setting entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::content_setting::ContentSetting;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct ContentSettingEntity {
    pub id: Uuid,
    pub key: String,
    pub value: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ContentSettingEntity> for ContentSetting {
    fn from(entity: ContentSettingEntity) -> Self {
        Self {
            id: entity.id,
            key: entity.key,
            value: entity.value,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
