//! Media asset entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::MediaAsset;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the media_assets table.
#[derive(Debug, Clone, FromRow)]
pub struct MediaAssetEntity {
    pub id: Uuid,
    pub file_name: String,
    pub url: String,
    pub alt_text: Option<String>,
    pub mime_type: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub category: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MediaAssetEntity> for MediaAsset {
    fn from(entity: MediaAssetEntity) -> Self {
        Self {
            id: entity.id,
            file_name: entity.file_name,
            url: entity.url,
            alt_text: entity.alt_text,
            mime_type: entity.mime_type,
            width: entity.width,
            height: entity.height,
            category: entity.category,
            created_by: entity.created_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
