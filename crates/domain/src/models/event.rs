//! Calendar events.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Draft,
    Published,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::Published => "published",
        }
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(EventStatus::Draft),
            "published" => Ok(EventStatus::Published),
            _ => Err(format!("Unknown event status: {}", s)),
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event, with the URL of its cover image when one is linked.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub status: EventStatus,
    pub cover_media_id: Option<Uuid>,
    pub cover_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(length(max = 255, message = "Slug must be at most 255 characters"))]
    pub slug: Option<String>,

    pub description: Option<String>,

    pub status: Option<EventStatus>,

    pub start_date: NaiveDate,

    pub end_date: Option<NaiveDate>,

    #[validate(length(max = 255, message = "Location must be at most 255 characters"))]
    pub location: Option<String>,

    #[validate(length(max = 120, message = "Category must be at most 120 characters"))]
    pub category: Option<String>,

    pub cover_media_id: Option<Uuid>,

    #[validate(length(max = 2048), custom(function = "shared::validation::validate_media_url"))]
    pub cover_image_url: Option<String>,
}

impl CreateEventRequest {
    pub fn validate_dates(&self) -> Result<(), String> {
        check_date_order(Some(self.start_date), self.end_date)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 255, message = "Slug must be at most 255 characters"))]
    pub slug: Option<String>,

    pub description: Option<String>,

    pub status: Option<EventStatus>,

    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,

    #[validate(length(max = 255, message = "Location must be at most 255 characters"))]
    pub location: Option<String>,

    #[validate(length(max = 120, message = "Category must be at most 120 characters"))]
    pub category: Option<String>,

    pub cover_media_id: Option<Uuid>,

    #[validate(length(max = 2048), custom(function = "shared::validation::validate_media_url"))]
    pub cover_image_url: Option<String>,
}

impl UpdateEventRequest {
    /// Checks the dates after merging with the stored event.
    pub fn validate_dates_against(&self, current: &Event) -> Result<(), String> {
        check_date_order(
            Some(self.start_date.unwrap_or(current.start_date)),
            self.end_date.or(current.end_date),
        )
    }
}

fn check_date_order(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<(), String> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => {
            Err("End date must not be before start date".to_string())
        }
        _ => Ok(()),
    }
}

/// File name recorded for a cover image linked by URL.
pub fn cover_file_name(url: &str) -> String {
    url.split(['?', '#'])
        .next()
        .and_then(|path| path.rsplit('/').next())
        .filter(|name| !name.is_empty())
        .unwrap_or("cover.jpg")
        .to_string()
}
