//! Page and page section entities (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Page, PageSection, PageStatus};
use serde_json::Value;
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// Database row mapping for the pages table.
#[derive(Debug, Clone, FromRow)]
pub struct PageEntity {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub status: String,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub seo_metadata: Option<Value>,
    pub featured_media_id: Option<Uuid>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PageEntity> for Page {
    fn from(entity: PageEntity) -> Self {
        Self {
            id: entity.id,
            slug: entity.slug,
            title: entity.title,
            excerpt: entity.excerpt,
            status: PageStatus::from_str(&entity.status).unwrap_or_default(),
            seo_title: entity.seo_title,
            seo_description: entity.seo_description,
            seo_metadata: entity.seo_metadata,
            featured_media_id: entity.featured_media_id,
            deleted_at: entity.deleted_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the page_sections table.
#[derive(Debug, Clone, FromRow)]
pub struct PageSectionEntity {
    pub id: Uuid,
    pub page_id: Uuid,
    pub key: String,
    pub display_order: i32,
    pub status: String,
    pub content: Value,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PageSectionEntity> for PageSection {
    fn from(entity: PageSectionEntity) -> Self {
        Self {
            id: entity.id,
            page_id: entity.page_id,
            key: entity.key,
            display_order: entity.display_order,
            status: PageStatus::from_str(&entity.status).unwrap_or_default(),
            content: entity.content,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
