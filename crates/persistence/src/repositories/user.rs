//! User and session repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{UserEntity, UserSessionEntity};
use crate::metrics::QueryTimer;

const USER_COLUMNS: &str = "id, first_name, last_name, email, password_hash, role, is_active, \
                            last_login_at, created_at, updated_at";

/// Field changes for an admin user. `None` leaves the column unchanged.
#[derive(Debug, Default, Clone)]
pub struct UserChanges<'a> {
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub role: Option<&'a str>,
    pub is_active: Option<bool>,
    pub password_hash: Option<&'a str>,
}

/// Session row to insert. The id is chosen by the caller because it is
/// embedded in the refresh token before the row exists.
#[derive(Debug, Clone)]
pub struct NewSession<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub refresh_token_hash: &'a str,
    pub user_agent: Option<&'a str>,
    pub ip_address: Option<&'a str>,
    pub expires_at: DateTime<Utc>,
}

/// Repository for admin users and their refresh sessions.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// All users, newest first.
    pub async fn list(&self) -> Result<Vec<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_users");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {} FROM users ORDER BY created_at DESC",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Find a user by email address, ignoring case.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1)",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Create a new admin user.
    pub async fn create(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            INSERT INTO users (first_name, last_name, email, password_hash, role, is_active)
            VALUES ($1, $2, $3, $4, $5, true)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Apply partial changes to a user.
    pub async fn update(
        &self,
        id: Uuid,
        changes: &UserChanges<'_>,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_user");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                role = COALESCE($5, role),
                is_active = COALESCE($6, is_active),
                password_hash = COALESCE($7, password_hash)
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(changes.first_name)
        .bind(changes.last_name)
        .bind(changes.email)
        .bind(changes.role)
        .bind(changes.is_active)
        .bind(changes.password_hash)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Replace a user's password hash.
    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("update_user_password");
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected());
        timer.finish(result)
    }

    /// Update user's last login timestamp.
    pub async fn update_last_login(
        &self,
        user_id: Uuid,
        last_login_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("update_user_last_login");
        let result = sqlx::query("UPDATE users SET last_login_at = $1 WHERE id = $2")
            .bind(last_login_at)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map(|_| ());
        timer.finish(result)
    }

    /// Active admins other than `exclude_id`.
    pub async fn count_other_active_admins(&self, exclude_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_other_active_admins");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM users
            WHERE role = 'admin' AND is_active = true AND id <> $1
            "#,
        )
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Whether another user already owns `email`.
    pub async fn email_taken_by_other(&self, email: &str, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("email_taken_by_other");
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1) AND id <> $2)",
        )
        .bind(email)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;
        timer.finish(result)
    }

    // =========================================================================
    // Sessions
    // =========================================================================

    /// Store a refresh session.
    pub async fn create_session(
        &self,
        session: &NewSession<'_>,
    ) -> Result<UserSessionEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user_session");
        let result = sqlx::query_as::<_, UserSessionEntity>(
            r#"
            INSERT INTO user_sessions (id, user_id, refresh_token_hash, user_agent, ip_address, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, refresh_token_hash, user_agent, ip_address, expires_at,
                      created_at, updated_at
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(session.refresh_token_hash)
        .bind(session.user_agent)
        .bind(session.ip_address)
        .bind(session.expires_at)
        .fetch_one(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Delete a session and return it. Of two concurrent callers with the
    /// same session only one gets the row back.
    pub async fn take_session(
        &self,
        session_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<UserSessionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("take_user_session");
        let result = sqlx::query_as::<_, UserSessionEntity>(
            r#"
            DELETE FROM user_sessions
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, refresh_token_hash, user_agent, ip_address, expires_at,
                      created_at, updated_at
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Delete one session. Returns the number of rows removed.
    pub async fn delete_session(&self, session_id: Uuid, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_user_session");
        let result = sqlx::query("DELETE FROM user_sessions WHERE id = $1 AND user_id = $2")
            .bind(session_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected());
        timer.finish(result)
    }

    /// Delete every session of a user.
    pub async fn delete_sessions_for_user(&self, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_user_sessions");
        let result = sqlx::query("DELETE FROM user_sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected());
        timer.finish(result)
    }

    /// Remove sessions that expired before `now`.
    pub async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_expired_sessions");
        let result = sqlx::query("DELETE FROM user_sessions WHERE expires_at < $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected());
        timer.finish(result)
    }
}
