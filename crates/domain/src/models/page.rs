//! Pages, their JSON content sections, and the trash.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::services::content_path::{ContentPath, ContentPathError};

/// Publication status shared by pages and sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Draft,
    Published,
}

impl PageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageStatus::Draft => "draft",
            PageStatus::Published => "published",
        }
    }
}

impl Default for PageStatus {
    fn default() -> Self {
        PageStatus::Draft
    }
}

impl FromStr for PageStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(PageStatus::Draft),
            "published" => Ok(PageStatus::Published),
            _ => Err(format!("Unknown page status: {}", s)),
        }
    }
}

impl std::fmt::Display for PageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub status: PageStatus,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub seo_metadata: Option<Value>,
    pub featured_media_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Page {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// A keyed block of JSON content on a page.
#[derive(Debug, Clone, Serialize)]
pub struct PageSection {
    pub id: Uuid,
    pub page_id: Uuid,
    pub key: String,
    pub display_order: i32,
    pub status: PageStatus,
    pub content: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A page with its sections in display order.
#[derive(Debug, Clone, Serialize)]
pub struct PageWithSections {
    #[serde(flatten)]
    pub page: Page,
    pub sections: Vec<PageSection>,
}

/// A soft-deleted page and the moment the purge job may remove it.
#[derive(Debug, Clone, Serialize)]
pub struct TrashedPage {
    #[serde(flatten)]
    pub page: Page,
    pub purge_after: DateTime<Utc>,
}

impl TrashedPage {
    pub fn new(page: Page, retention_days: i32) -> Self {
        let deleted_at = page.deleted_at.unwrap_or(page.updated_at);
        Self {
            purge_after: deleted_at + Duration::days(i64::from(retention_days)),
            page,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePageRequest {
    #[validate(length(min = 1, max = 255, message = "Slug must be 1-255 characters"))]
    pub slug: String,

    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    pub excerpt: Option<String>,

    #[validate(length(max = 255, message = "SEO title must be at most 255 characters"))]
    pub seo_title: Option<String>,

    pub seo_description: Option<String>,

    pub seo_metadata: Option<Value>,

    pub featured_media_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePageRequest {
    #[validate(length(min = 1, max = 255, message = "Slug must be 1-255 characters"))]
    pub slug: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    pub excerpt: Option<String>,

    pub status: Option<PageStatus>,

    #[validate(length(max = 255, message = "SEO title must be at most 255 characters"))]
    pub seo_title: Option<String>,

    pub seo_description: Option<String>,

    pub seo_metadata: Option<Value>,

    pub featured_media_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSectionRequest {
    #[validate(length(min = 1, max = 150, message = "Key must be 1-150 characters"))]
    pub key: String,

    pub display_order: i32,

    /// Left out, a known key starts from its schema defaults and any other
    /// key from `{}`.
    #[serde(default)]
    pub content: Option<Value>,

    pub status: Option<PageStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSectionRequest {
    #[validate(length(min = 1, max = 150, message = "Key must be 1-150 characters"))]
    pub key: Option<String>,

    pub display_order: Option<i32>,

    pub content: Option<Value>,

    pub status: Option<PageStatus>,
}

/// One segment of a content path as sent by the editor: a key or an index.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PathSegmentInput {
    Index(u64),
    Key(String),
}

impl PathSegmentInput {
    fn as_text(&self) -> String {
        match self {
            PathSegmentInput::Index(index) => index.to_string(),
            PathSegmentInput::Key(key) => key.clone(),
        }
    }
}

/// A content path in dotted form (`slides.0.title`) or as a segment list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PathInput {
    Dotted(String),
    Segments(Vec<PathSegmentInput>),
}

impl PathInput {
    pub fn to_content_path(&self) -> Result<ContentPath, ContentPathError> {
        match self {
            PathInput::Dotted(path) => ContentPath::parse(path.trim()),
            PathInput::Segments(segments) => {
                let raw: Vec<String> = segments.iter().map(PathSegmentInput::as_text).collect();
                ContentPath::from_segments(&raw)
            }
        }
    }
}

/// Sets a single value inside a section's stored content.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetSectionContentRequest {
    pub path: PathInput,
    #[serde(default)]
    pub value: Value,
}

/// `?path=slides.0.title` on a content removal.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoveSectionContentQuery {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListPagesQuery {
    pub slug: Option<String>,
}

/// Section content must be a JSON object at the top level.
pub fn ensure_object_content(content: &Value) -> Result<(), String> {
    if content.is_object() {
        Ok(())
    } else {
        Err("Section content must be a JSON object".to_string())
    }
}
