//! Trash retention period, stored in content settings with a config fallback.

use chrono::{DateTime, Duration, Utc};
use domain::models::content_setting::{
    normalize_retention_days, parse_retention_days, TRASH_RETENTION_KEY,
};
use persistence::repositories::ContentSettingRepository;
use sqlx::PgPool;

/// The stored retention period, or `default_days` when none is stored or it
/// does not parse to a positive number.
pub async fn retention_days(pool: &PgPool, default_days: i32) -> Result<i32, sqlx::Error> {
    let stored = ContentSettingRepository::new(pool.clone())
        .get(TRASH_RETENTION_KEY)
        .await?;
    Ok(resolve(stored.and_then(|s| s.value).as_deref(), default_days))
}

/// Stores `days`, clamped to at least one. Returns the stored value.
pub async fn set_retention_days(pool: &PgPool, days: i32) -> Result<i32, sqlx::Error> {
    let days = normalize_retention_days(days);
    ContentSettingRepository::new(pool.clone())
        .upsert(TRASH_RETENTION_KEY, &days.to_string())
        .await?;
    Ok(days)
}

/// Pages deleted before this instant are due for purging.
pub fn purge_cutoff(now: DateTime<Utc>, days: i32) -> DateTime<Utc> {
    now - Duration::days(i64::from(days))
}

fn resolve(stored: Option<&str>, default_days: i32) -> i32 {
    stored
        .and_then(parse_retention_days)
        .unwrap_or_else(|| normalize_retention_days(default_days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_resolve_prefers_valid_stored_value() {
        assert_eq!(resolve(Some("14"), 30), 14);
        assert_eq!(resolve(Some("0"), 30), 30);
        assert_eq!(resolve(Some("soon"), 30), 30);
        assert_eq!(resolve(None, 30), 30);
    }

    #[test]
    fn test_purge_cutoff() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        assert_eq!(
            purge_cutoff(now, 30),
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
        );
    }
}
