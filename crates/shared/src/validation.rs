//! Field validators shared by request DTOs.

use chrono::NaiveDate;
use validator::ValidationError;

/// Rejects strings that are empty after trimming.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Accepts absolute http(s) URLs and site-relative paths such as `/uploads/a.png`.
pub fn validate_media_url(value: &str) -> Result<(), ValidationError> {
    let ok = value.starts_with("http://")
        || value.starts_with("https://")
        || (value.starts_with('/') && !value.starts_with("//"));
    if ok && !value.chars().any(char::is_whitespace) {
        Ok(())
    } else {
        let mut err = ValidationError::new("media_url");
        err.message = Some("Must be an http(s) URL or a path starting with /".into());
        Err(err)
    }
}

/// Validates a calendar date in `YYYY-MM-DD` form.
pub fn validate_iso_date(value: &str) -> Result<(), ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| {
            let mut err = ValidationError::new("date_format");
            err.message = Some("Date must use the YYYY-MM-DD format".into());
            err
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Nairobi").is_ok());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("").is_err());
    }

    #[test]
    fn test_validate_media_url() {
        assert!(validate_media_url("https://cdn.example.org/a.jpg").is_ok());
        assert!(validate_media_url("http://localhost:4000/uploads/a.jpg").is_ok());
        assert!(validate_media_url("/uploads/1700000000000-123.png").is_ok());
        assert!(validate_media_url("//evil.example/a.png").is_err());
        assert!(validate_media_url("ftp://files/a.png").is_err());
        assert!(validate_media_url("/uploads/a b.png").is_err());
    }

    #[test]
    fn test_validate_iso_date() {
        assert!(validate_iso_date("2024-12-01").is_ok());
        assert!(validate_iso_date("2024-02-30").is_err());
        assert!(validate_iso_date("01/12/2024").is_err());
        let err = validate_iso_date("soon").unwrap_err();
        assert_eq!(err.code, "date_format");
    }
}
