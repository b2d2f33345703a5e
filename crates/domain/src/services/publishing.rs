//! Publication date rules for news articles.

use chrono::{DateTime, Utc};

use crate::models::news_post::NewsStatus;

/// Resolves `published_at` for a status.
///
/// - published: the provided date, else `now`
/// - scheduled: the provided date, else none
/// - draft: always none
pub fn determine_published_at(
    status: NewsStatus,
    provided: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match status {
        NewsStatus::Published => Some(provided.unwrap_or(now)),
        NewsStatus::Scheduled => provided,
        NewsStatus::Draft => None,
    }
}

/// Whether a post is visible on the public site at `now`.
pub fn is_publicly_visible(
    status: NewsStatus,
    published_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    status == NewsStatus::Published && published_at.map_or(true, |at| at <= now)
}
