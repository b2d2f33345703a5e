//! News post entities (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::news_post::NewsSummary;
use domain::models::{NewsPost, NewsStatus};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// Database row mapping for the news_posts table.
#[derive(Debug, Clone, FromRow)]
pub struct NewsPostEntity {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub body: String,
    pub status: String,
    pub published_at: Option<DateTime<Utc>>,
    pub hero_media_id: Option<Uuid>,
    pub hero_image_url: Option<String>,
    pub author_id: Option<Uuid>,
    pub show_on_home: bool,
    pub home_display_order: i32,
    pub reading_time: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<NewsPostEntity> for NewsPost {
    fn from(entity: NewsPostEntity) -> Self {
        Self {
            id: entity.id,
            slug: entity.slug,
            title: entity.title,
            excerpt: entity.excerpt,
            body: entity.body,
            status: NewsStatus::from_str(&entity.status).unwrap_or_default(),
            published_at: entity.published_at,
            hero_media_id: entity.hero_media_id,
            hero_image_url: entity.hero_image_url,
            author_id: entity.author_id,
            show_on_home: entity.show_on_home,
            home_display_order: entity.home_display_order,
            reading_time: entity.reading_time,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Summary columns used by the public news listing.
#[derive(Debug, Clone, FromRow)]
pub struct NewsSummaryEntity {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub hero_image_url: Option<String>,
    pub hero_media_id: Option<Uuid>,
    pub reading_time: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub show_on_home: bool,
    pub home_display_order: i32,
}

impl From<NewsSummaryEntity> for NewsSummary {
    fn from(entity: NewsSummaryEntity) -> Self {
        Self {
            id: entity.id,
            slug: entity.slug,
            title: entity.title,
            excerpt: entity.excerpt,
            hero_image_url: entity.hero_image_url,
            hero_media_id: entity.hero_media_id,
            reading_time: entity.reading_time,
            published_at: entity.published_at,
            show_on_home: entity.show_on_home,
            home_display_order: entity.home_display_order,
        }
    }
}
