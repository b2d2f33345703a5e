//! Password reset token repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::PasswordResetTokenEntity;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct PasswordResetRepository {
    pool: PgPool,
}

impl PasswordResetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a new reset code hash.
    pub async fn create(
        &self,
        user_id: Uuid,
        code_hash: &str,
        plain_preview: Option<&str>,
        expires_at: DateTime<Utc>,
        request_ip: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<PasswordResetTokenEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_password_reset_token");
        let result = sqlx::query_as::<_, PasswordResetTokenEntity>(
            r#"
            INSERT INTO password_reset_tokens
                (user_id, code_hash, plain_preview, expires_at, request_ip, user_agent)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, code_hash, plain_preview, expires_at, used_at,
                      request_ip, user_agent, created_at
            "#,
        )
        .bind(user_id)
        .bind(code_hash)
        .bind(plain_preview)
        .bind(expires_at)
        .bind(request_ip)
        .bind(user_agent)
        .fetch_one(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Most recent code of a user that has not been used.
    pub async fn find_latest_unused(
        &self,
        user_id: Uuid,
    ) -> Result<Option<PasswordResetTokenEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_latest_unused_reset_token");
        let result = sqlx::query_as::<_, PasswordResetTokenEntity>(
            r#"
            SELECT id, user_id, code_hash, plain_preview, expires_at, used_at,
                   request_ip, user_agent, created_at
            FROM password_reset_tokens
            WHERE user_id = $1 AND used_at IS NULL
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Sets the new password, signs the user out everywhere and consumes the
    /// code, all in one transaction.
    pub async fn complete_reset(
        &self,
        token_id: Uuid,
        user_id: Uuid,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("complete_password_reset");
        timer.finish(
            self.complete_reset_in_tx(token_id, user_id, password_hash, now)
                .await,
        )
    }

    async fn complete_reset_in_tx(
        &self,
        token_id: Uuid,
        user_id: Uuid,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(user_id)
            .bind(password_hash)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM user_sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE password_reset_tokens SET used_at = $2 WHERE id = $1")
            .bind(token_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Deletes codes that expired or were consumed before `cutoff`.
    pub async fn delete_stale(&self, cutoff: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_stale_reset_tokens");
        let result = sqlx::query(
            "DELETE FROM password_reset_tokens WHERE expires_at < $1 OR used_at < $1",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map(|r| r.rows_affected());
        timer.finish(result)
    }
}
