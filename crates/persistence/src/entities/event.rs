//! Event entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::{Event, EventStatus};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// Row from events left-joined with its cover media asset.
#[derive(Debug, Clone, FromRow)]
pub struct EventEntity {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub status: String,
    pub cover_media_id: Option<Uuid>,
    pub cover_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventEntity> for Event {
    fn from(entity: EventEntity) -> Self {
        Self {
            id: entity.id,
            slug: entity.slug,
            title: entity.title,
            description: entity.description,
            start_date: entity.start_date,
            end_date: entity.end_date,
            location: entity.location,
            category: entity.category,
            status: EventStatus::from_str(&entity.status).unwrap_or(EventStatus::Draft),
            cover_media_id: entity.cover_media_id,
            cover_image_url: entity.cover_image_url,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
