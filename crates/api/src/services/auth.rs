//! Authentication service: login, refresh rotation, logout and password resets.

use chrono::{DateTime, Duration, Utc};
use domain::models::auth::{AuthUser, LoginResponse, TokenResponse};
use domain::models::password_reset::{reset_code_expiry, PasswordResetToken, RESET_CODE_DIGITS};
use domain::models::user::normalize_email;
use domain::models::User;
use persistence::repositories::{NewSession, PasswordResetRepository, UserRepository};
use shared::crypto::{constant_time_eq, generate_numeric_code, sha256_hex};
use shared::jwt::{extract_session_id, extract_user_id, JwtConfig, JwtError};
use shared::password::{hash_password, verify_password, PasswordError};
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::extractors::ClientInfo;
use crate::middleware::metrics::record_login_attempt;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Session expired")]
    SessionExpired,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Unknown reset email")]
    UnknownResetEmail,

    #[error("Reset code has expired")]
    ResetCodeExpired,

    #[error("Invalid reset code")]
    InvalidResetCode,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid email or password".to_string())
            }
            AuthError::SessionExpired => ApiError::Unauthorized("Session expired".to_string()),
            AuthError::InvalidRefreshToken => {
                ApiError::Unauthorized("Invalid refresh token".to_string())
            }
            AuthError::UserNotFound => ApiError::Unauthorized("User not found".to_string()),
            AuthError::UnknownResetEmail => ApiError::NotFound("Invalid reset code".to_string()),
            AuthError::ResetCodeExpired => ApiError::Validation("Reset code has expired".to_string()),
            AuthError::InvalidResetCode => ApiError::Validation("Invalid reset code".to_string()),
            AuthError::TokenError(e) => ApiError::Internal(format!("Token error: {}", e)),
            AuthError::PasswordError(e) => ApiError::Internal(format!("Password error: {}", e)),
            AuthError::DatabaseError(e) => ApiError::from(e),
        }
    }
}

/// A reset code issued for a known user, to be emailed.
#[derive(Debug, Clone)]
pub struct IssuedResetCode {
    pub user: User,
    pub code: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    resets: PasswordResetRepository,
    jwt: Arc<JwtConfig>,
    pepper: String,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt: Arc<JwtConfig>, pepper: &str) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            resets: PasswordResetRepository::new(pool),
            jwt,
            pepper: pepper.to_string(),
        }
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        Ok(hash_password(password, &self.pepper)?)
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(verify_password(password, &self.pepper, hash)?)
    }

    /// Unknown, inactive and wrong-password logins are indistinguishable.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        client: &ClientInfo,
    ) -> Result<LoginResponse, AuthError> {
        let user = match self.users.find_by_email(&normalize_email(email)).await? {
            Some(entity) => User::from(entity),
            None => {
                record_login_attempt("invalid_credentials");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !user.is_active || !self.verify_password(password, &user.password_hash)? {
            record_login_attempt("invalid_credentials");
            return Err(AuthError::InvalidCredentials);
        }

        let now = Utc::now();
        self.users.update_last_login(user.id, now).await?;
        let tokens = self
            .start_session(&user, client.user_agent.as_deref(), client.ip.as_deref(), now)
            .await?;

        record_login_attempt("success");
        info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(LoginResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            user: AuthUser::from(&user),
        })
    }

    /// Exchanges a refresh token for a new pair. The old session is consumed.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, AuthError> {
        let claims = self
            .jwt
            .validate_refresh_token(refresh_token)
            .map_err(|e| match e {
                JwtError::TokenExpired => AuthError::SessionExpired,
                _ => AuthError::InvalidRefreshToken,
            })?;
        let user_id = extract_user_id(&claims).map_err(|_| AuthError::InvalidRefreshToken)?;
        let session_id = extract_session_id(&claims).map_err(|_| AuthError::InvalidRefreshToken)?;

        // Consumed up front: a replayed token finds no session.
        let now = Utc::now();
        let session = match self.users.take_session(session_id, user_id).await? {
            Some(session) if !session.is_expired_at(now) => session,
            _ => return Err(AuthError::SessionExpired),
        };

        if !constant_time_eq(&sha256_hex(refresh_token), &session.refresh_token_hash) {
            warn!(user_id = %user_id, session_id = %session_id, "Refresh token hash mismatch, session revoked");
            return Err(AuthError::InvalidRefreshToken);
        }

        let user = match self.users.find_by_id(user_id).await? {
            Some(entity) if entity.is_active => User::from(entity),
            _ => return Err(AuthError::UserNotFound),
        };

        let tokens = self
            .start_session(
                &user,
                session.user_agent.as_deref(),
                session.ip_address.as_deref(),
                now,
            )
            .await?;

        Ok(TokenResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
        })
    }

    /// Deletes the session a refresh token belongs to.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        let claims = self
            .jwt
            .validate_refresh_token(refresh_token)
            .map_err(|_| AuthError::InvalidRefreshToken)?;
        let user_id = extract_user_id(&claims).map_err(|_| AuthError::InvalidRefreshToken)?;
        let session_id = extract_session_id(&claims).map_err(|_| AuthError::InvalidRefreshToken)?;

        let removed = self.users.delete_session(session_id, user_id).await?;
        info!(user_id = %user_id, removed, "User logged out");
        Ok(())
    }

    /// Stores a fresh reset code for a known, active user. Returns `None`
    /// for unknown addresses so callers answer identically either way.
    pub async fn request_password_reset(
        &self,
        email: &str,
        client: &ClientInfo,
    ) -> Result<Option<IssuedResetCode>, AuthError> {
        let user = match self.users.find_by_email(&normalize_email(email)).await? {
            Some(entity) if entity.is_active => User::from(entity),
            _ => return Ok(None),
        };

        let code = generate_numeric_code(RESET_CODE_DIGITS);
        self.resets
            .create(
                user.id,
                &sha256_hex(&code),
                Some(&code),
                reset_code_expiry(Utc::now()),
                client.ip.as_deref(),
                client.user_agent.as_deref(),
            )
            .await?;

        info!(user_id = %user.id, "Password reset code issued");
        Ok(Some(IssuedResetCode { user, code }))
    }

    /// Checks the latest unused code and sets the new password. All sessions
    /// of the user are revoked.
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let user = self
            .users
            .find_by_email(&normalize_email(email))
            .await?
            .map(User::from)
            .ok_or(AuthError::UnknownResetEmail)?;

        let now = Utc::now();
        let token: PasswordResetToken = self
            .resets
            .find_latest_unused(user.id)
            .await?
            .map(PasswordResetToken::from)
            .ok_or(AuthError::ResetCodeExpired)?;

        if token.is_expired_at(now) {
            return Err(AuthError::ResetCodeExpired);
        }
        if !constant_time_eq(&sha256_hex(code.trim()), &token.code_hash) {
            return Err(AuthError::InvalidResetCode);
        }

        let password_hash = self.hash_password(new_password)?;
        self.resets
            .complete_reset(token.id, user.id, &password_hash, now)
            .await?;

        info!(user_id = %user.id, "Password reset completed");
        Ok(())
    }

    async fn start_session(
        &self,
        user: &User,
        user_agent: Option<&str>,
        ip_address: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<shared::jwt::IssuedTokens, AuthError> {
        let session_id = Uuid::new_v4();
        let tokens = self.jwt.issue_pair(user.id, user.role.as_str(), session_id)?;
        let refresh_token_hash = sha256_hex(&tokens.refresh_token);

        self.users
            .create_session(&NewSession {
                id: session_id,
                user_id: user.id,
                refresh_token_hash: &refresh_token_hash,
                user_agent,
                ip_address,
                expires_at: now + Duration::seconds(self.jwt.refresh_token_expiry_secs),
            })
            .await?;

        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_auth_error_status_mapping() {
        let cases = [
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::SessionExpired, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidRefreshToken, StatusCode::UNAUTHORIZED),
            (AuthError::UserNotFound, StatusCode::UNAUTHORIZED),
            (AuthError::UnknownResetEmail, StatusCode::NOT_FOUND),
            (AuthError::ResetCodeExpired, StatusCode::BAD_REQUEST),
            (AuthError::InvalidResetCode, StatusCode::BAD_REQUEST),
            (AuthError::TokenError(JwtError::InvalidToken), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_invalid_credentials_message() {
        match ApiError::from(AuthError::InvalidCredentials) {
            ApiError::Unauthorized(msg) => assert_eq!(msg, "Invalid email or password"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
