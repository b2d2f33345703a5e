//! News articles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::common::deserialize_present;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsStatus {
    Draft,
    Scheduled,
    Published,
}

impl NewsStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsStatus::Draft => "draft",
            NewsStatus::Scheduled => "scheduled",
            NewsStatus::Published => "published",
        }
    }
}

impl Default for NewsStatus {
    fn default() -> Self {
        NewsStatus::Draft
    }
}

impl FromStr for NewsStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(NewsStatus::Draft),
            "scheduled" => Ok(NewsStatus::Scheduled),
            "published" => Ok(NewsStatus::Published),
            _ => Err(format!("Unknown news status: {}", s)),
        }
    }
}

impl std::fmt::Display for NewsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsPost {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub body: String,
    pub status: NewsStatus,
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

/// Columns exposed by the public news listing.
#[derive(Debug, Clone, Serialize)]
pub struct NewsSummary {
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

impl From<NewsPost> for NewsSummary {
    fn from(post: NewsPost) -> Self {
        Self {
            id: post.id,
            slug: post.slug,
            title: post.title,
            excerpt: post.excerpt,
            hero_image_url: post.hero_image_url,
            hero_media_id: post.hero_media_id,
            reading_time: post.reading_time,
            published_at: post.published_at,
            show_on_home: post.show_on_home,
            home_display_order: post.home_display_order,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNewsRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(length(max = 255, message = "Slug must be at most 255 characters"))]
    pub slug: Option<String>,

    pub excerpt: Option<String>,

    #[validate(length(min = 1, message = "Body is required"))]
    pub body: String,

    pub status: Option<NewsStatus>,

    pub published_at: Option<DateTime<Utc>>,

    pub show_on_home: Option<bool>,

    #[validate(range(min = 0, message = "Home display order must be non-negative"))]
    pub home_display_order: Option<i32>,

    #[validate(length(max = 2048), custom(function = "shared::validation::validate_media_url"))]
    pub hero_image_url: Option<String>,

    pub hero_media_id: Option<Uuid>,

    pub author_id: Option<Uuid>,

    #[validate(length(max = 50, message = "Reading time must be at most 50 characters"))]
    pub reading_time: Option<String>,
}

/// Partial update. `publishedAt: null` clears the date when no status is sent.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNewsRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 255, message = "Slug must be at most 255 characters"))]
    pub slug: Option<String>,

    pub excerpt: Option<String>,

    #[validate(length(min = 1, message = "Body must not be empty"))]
    pub body: Option<String>,

    pub status: Option<NewsStatus>,

    #[serde(default, deserialize_with = "deserialize_present")]
    pub published_at: Option<Option<DateTime<Utc>>>,

    pub show_on_home: Option<bool>,

    #[validate(range(min = 0, message = "Home display order must be non-negative"))]
    pub home_display_order: Option<i32>,

    #[validate(length(max = 2048), custom(function = "shared::validation::validate_media_url"))]
    pub hero_image_url: Option<String>,

    pub hero_media_id: Option<Uuid>,

    pub author_id: Option<Uuid>,

    #[validate(length(max = 50, message = "Reading time must be at most 50 characters"))]
    pub reading_time: Option<String>,
}

/// Admin listing filters. Raw strings so bad values can be ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminNewsQuery {
    pub status: Option<String>,
    pub show_on_home: Option<String>,
    pub search: Option<String>,
}

impl AdminNewsQuery {
    pub fn status_filter(&self) -> Option<NewsStatus> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }

    /// Only the literal strings `true` and `false` filter.
    pub fn show_on_home_filter(&self) -> Option<bool> {
        match self.show_on_home.as_deref() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        }
    }

    /// Lowercased `%term%` pattern, or `None` for an empty search. `%`, `_`
    /// and `\` in the term match literally under `ESCAPE '\'`.
    pub fn search_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(&s.to_lowercase())))
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicNewsQuery {
    pub featured: Option<String>,
    pub limit: Option<i64>,
}

impl PublicNewsQuery {
    pub fn featured_only(&self) -> bool {
        self.featured.as_deref() == Some("true")
    }

    /// Positive limits only. `None` lists every match.
    pub fn effective_limit(&self) -> Option<i64> {
        self.limit.filter(|l| *l > 0)
    }
}
