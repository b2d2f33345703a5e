//! One-time password reset codes.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Number of digits in an emailed reset code.
pub const RESET_CODE_DIGITS: usize = 6;

/// Minutes a reset code stays valid.
pub const RESET_CODE_TTL_MINUTES: i64 = 15;

/// Reply sent for every forgot-password request, known address or not.
pub const FORGOT_PASSWORD_MESSAGE: &str = "If that email exists, a reset code has been sent.";

/// A stored reset code. Only the hash is used for verification.
#[derive(Debug, Clone)]
pub struct PasswordResetToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub code_hash: String,
    pub plain_preview: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub request_ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PasswordResetToken {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }
}

/// Expiry for a code issued at `now`.
pub fn reset_code_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::minutes(RESET_CODE_TTL_MINUTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(expires_at: DateTime<Utc>) -> PasswordResetToken {
        PasswordResetToken {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            code_hash: "abc".to_string(),
            plain_preview: Some("123456".to_string()),
            expires_at,
            used_at: None,
            request_ip: None,
            user_agent: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_expiry_is_fifteen_minutes() {
        let now = Utc::now();
        assert_eq!(reset_code_expiry(now) - now, Duration::minutes(15));
    }

    #[test]
    fn test_is_expired_at() {
        let now = Utc::now();
        assert!(!token(now + Duration::minutes(1)).is_expired_at(now));
        assert!(token(now - Duration::seconds(1)).is_expired_at(now));
    }

    #[test]
    fn test_is_used() {
        let mut t = token(Utc::now());
        assert!(!t.is_used());
        t.used_at = Some(Utc::now());
        assert!(t.is_used());
    }
}
