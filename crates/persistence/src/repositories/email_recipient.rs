//! Email recipient repository.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::EmailRecipientEntity;
use crate::metrics::QueryTimer;

const RECIPIENT_COLUMNS: &str =
    "id, email, name, type, is_active, display_order, created_at, updated_at";

#[derive(Clone)]
pub struct EmailRecipientRepository {
    pool: PgPool,
}

impl EmailRecipientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All recipients grouped by type.
    pub async fn list(&self) -> Result<Vec<EmailRecipientEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_email_recipients");
        let result = sqlx::query_as::<_, EmailRecipientEntity>(&format!(
            "SELECT {} FROM email_recipients ORDER BY type, display_order, created_at",
            RECIPIENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Addresses of active recipients of one type.
    pub async fn active_emails(&self, recipient_type: &str) -> Result<Vec<String>, sqlx::Error> {
        let timer = QueryTimer::new("active_recipient_emails");
        let result = sqlx::query_scalar::<_, String>(
            r#"
            SELECT email FROM email_recipients
            WHERE type = $1 AND is_active = true
            ORDER BY display_order, created_at
            "#,
        )
        .bind(recipient_type)
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn create(
        &self,
        email: &str,
        name: Option<&str>,
        recipient_type: &str,
        is_active: bool,
        display_order: i32,
    ) -> Result<EmailRecipientEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_email_recipient");
        let result = sqlx::query_as::<_, EmailRecipientEntity>(&format!(
            r#"
            INSERT INTO email_recipients (email, name, type, is_active, display_order)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            RECIPIENT_COLUMNS
        ))
        .bind(email)
        .bind(name)
        .bind(recipient_type)
        .bind(is_active)
        .bind(display_order)
        .fetch_one(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn update(
        &self,
        id: Uuid,
        email: Option<&str>,
        name: Option<&str>,
        recipient_type: Option<&str>,
        is_active: Option<bool>,
        display_order: Option<i32>,
    ) -> Result<Option<EmailRecipientEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_email_recipient");
        let result = sqlx::query_as::<_, EmailRecipientEntity>(&format!(
            r#"
            UPDATE email_recipients
            SET email = COALESCE($2, email),
                name = COALESCE($3, name),
                type = COALESCE($4, type),
                is_active = COALESCE($5, is_active),
                display_order = COALESCE($6, display_order)
            WHERE id = $1
            RETURNING {}
            "#,
            RECIPIENT_COLUMNS
        ))
        .bind(id)
        .bind(email)
        .bind(name)
        .bind(recipient_type)
        .bind(is_active)
        .bind(display_order)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_email_recipient");
        let result = sqlx::query("DELETE FROM email_recipients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected());
        timer.finish(result)
    }
}
