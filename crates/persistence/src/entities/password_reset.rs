//! Password reset token entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::password_reset::PasswordResetToken;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the password_reset_tokens table.
#[derive(Debug, Clone, FromRow)]
pub struct PasswordResetTokenEntity {
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

impl From<PasswordResetTokenEntity> for PasswordResetToken {
    fn from(entity: PasswordResetTokenEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            code_hash: entity.code_hash,
            plain_preview: entity.plain_preview,
            expires_at: entity.expires_at,
            used_at: entity.used_at,
            request_ip: entity.request_ip,
            user_agent: entity.user_agent,
            created_at: entity.created_at,
        }
    }
}
