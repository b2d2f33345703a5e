//! Key/value content settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Settings key holding the trash retention period in days.
pub const TRASH_RETENTION_KEY: &str = "trashRetentionDays";

#[derive(Debug, Clone, Serialize)]
pub struct ContentSetting {
    pub id: Uuid,
    pub key: String,
    pub value: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parses a stored retention value. Non-numeric or non-positive values are ignored.
pub fn parse_retention_days(value: &str) -> Option<i32> {
    value.trim().parse::<i32>().ok().filter(|days| *days > 0)
}

/// Clamps a requested retention period to at least one day.
pub fn normalize_retention_days(days: i32) -> i32 {
    days.max(1)
}

/// Request payload for updating the trash retention period.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRetentionRequest {
    #[validate(range(min = 1, message = "Retention must be at least 1 day"))]
    pub days: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RetentionResponse {
    pub days: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_retention_days() {
        assert_eq!(parse_retention_days("45"), Some(45));
        assert_eq!(parse_retention_days(" 7 "), Some(7));
        assert_eq!(parse_retention_days("0"), None);
        assert_eq!(parse_retention_days("-3"), None);
        assert_eq!(parse_retention_days("thirty"), None);
    }

    #[test]
    fn test_normalize_retention_days() {
        assert_eq!(normalize_retention_days(0), 1);
        assert_eq!(normalize_retention_days(-10), 1);
        assert_eq!(normalize_retention_days(14), 14);
    }

    #[test]
    fn test_update_request_requires_positive_days() {
        assert!(UpdateRetentionRequest { days: 0 }.validate().is_err());
        assert!(UpdateRetentionRequest { days: 1 }.validate().is_ok());
    }
}
