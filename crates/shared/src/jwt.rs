//! JWT access and refresh tokens signed with HS256.
//!
//! Access and refresh tokens use separate secrets so a leaked refresh secret
//! cannot mint access tokens and vice versa. Refresh tokens carry the id of
//! the server-side session row they belong to (`sid`).

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// JWT token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Role name at issue time
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
    pub token_type: TokenType,
    /// Session id, refresh tokens only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Default leeway in seconds for clock skew tolerance
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Signing material and lifetimes for both token kinds.
#[derive(Clone)]
pub struct JwtConfig {
    access_encoding_key: EncodingKey,
    access_decoding_key: DecodingKey,
    refresh_encoding_key: EncodingKey,
    refresh_decoding_key: DecodingKey,
    pub access_token_expiry_secs: i64,
    pub refresh_token_expiry_secs: i64,
    pub leeway_secs: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_token_expiry_secs", &self.access_token_expiry_secs)
            .field("refresh_token_expiry_secs", &self.refresh_token_expiry_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field("access_secret", &"[REDACTED]")
            .field("refresh_secret", &"[REDACTED]")
            .finish()
    }
}

/// A freshly issued token pair.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

impl JwtConfig {
    pub fn new(
        access_secret: &str,
        refresh_secret: &str,
        access_token_expiry_secs: i64,
        refresh_token_expiry_secs: i64,
        leeway_secs: u64,
    ) -> Result<Self, JwtError> {
        if access_secret.is_empty() || refresh_secret.is_empty() {
            return Err(JwtError::InvalidKey("JWT secrets must not be empty".to_string()));
        }

        Ok(Self {
            access_encoding_key: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding_key: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding_key: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding_key: DecodingKey::from_secret(refresh_secret.as_bytes()),
            access_token_expiry_secs,
            refresh_token_expiry_secs,
            leeway_secs,
        })
    }

    /// Generates an access token. Returns `(token, jti)`.
    pub fn generate_access_token(
        &self,
        user_id: Uuid,
        role: &str,
    ) -> Result<(String, String), JwtError> {
        self.generate_token(user_id, role, None, TokenType::Access)
    }

    /// Generates a refresh token bound to `session_id`. Returns `(token, jti)`.
    pub fn generate_refresh_token(
        &self,
        user_id: Uuid,
        role: &str,
        session_id: Uuid,
    ) -> Result<(String, String), JwtError> {
        self.generate_token(user_id, role, Some(session_id), TokenType::Refresh)
    }

    /// Issues an access/refresh pair for a session.
    pub fn issue_pair(
        &self,
        user_id: Uuid,
        role: &str,
        session_id: Uuid,
    ) -> Result<IssuedTokens, JwtError> {
        let (access_token, _) = self.generate_access_token(user_id, role)?;
        let (refresh_token, _) = self.generate_refresh_token(user_id, role, session_id)?;
        Ok(IssuedTokens {
            access_token,
            refresh_token,
            expires_in: self.access_token_expiry_secs,
        })
    }

    fn generate_token(
        &self,
        user_id: Uuid,
        role: &str,
        session_id: Option<Uuid>,
        token_type: TokenType,
    ) -> Result<(String, String), JwtError> {
        let now = Utc::now();
        let (expiry_secs, key) = match token_type {
            TokenType::Access => (self.access_token_expiry_secs, &self.access_encoding_key),
            TokenType::Refresh => (self.refresh_token_expiry_secs, &self.refresh_encoding_key),
        };
        let jti = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            exp: (now + Duration::seconds(expiry_secs)).timestamp(),
            iat: now.timestamp(),
            jti: jti.clone(),
            token_type,
            sid: session_id.map(|id| id.to_string()),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))?;

        Ok((token, jti))
    }

    fn decode_with(&self, token: &str, key: &DecodingKey) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;

        decode::<Claims>(token, key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidToken,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }

    /// Validates an access token.
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.decode_with(token, &self.access_decoding_key)?;
        if claims.token_type != TokenType::Access {
            return Err(JwtError::InvalidToken);
        }
        Ok(claims)
    }

    /// Validates a refresh token. The session id claim must be present.
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.decode_with(token, &self.refresh_decoding_key)?;
        if claims.token_type != TokenType::Refresh || claims.sid.is_none() {
            return Err(JwtError::InvalidToken);
        }
        Ok(claims)
    }
}

/// Extracts user ID from validated claims.
pub fn extract_user_id(claims: &Claims) -> Result<Uuid, JwtError> {
    Uuid::parse_str(&claims.sub).map_err(|_| JwtError::InvalidToken)
}

/// Extracts the session id from refresh token claims.
pub fn extract_session_id(claims: &Claims) -> Result<Uuid, JwtError> {
    claims
        .sid
        .as_deref()
        .and_then(|sid| Uuid::parse_str(sid).ok())
        .ok_or(JwtError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration as StdDuration;

    fn test_config() -> JwtConfig {
        JwtConfig::new(
            "access_secret_for_unit_tests_0123456789",
            "refresh_secret_for_unit_tests_0123456789",
            900,
            604800,
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_access_token_carries_role() {
        let config = test_config();
        let user_id = Uuid::new_v4();

        let (token, jti) = config.generate_access_token(user_id, "editor").unwrap();
        let claims = config.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, "editor");
        assert_eq!(claims.jti, jti);
        assert!(claims.sid.is_none());
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn test_refresh_token_carries_session() {
        let config = test_config();
        let user_id = Uuid::new_v4();
        let session_id = Uuid::new_v4();

        let (token, _) = config
            .generate_refresh_token(user_id, "admin", session_id)
            .unwrap();
        let claims = config.validate_refresh_token(&token).unwrap();

        assert_eq!(extract_session_id(&claims).unwrap(), session_id);
        assert_eq!(extract_user_id(&claims).unwrap(), user_id);
        assert_eq!(claims.token_type, TokenType::Refresh);
    }

    #[test]
    fn test_tokens_are_not_interchangeable() {
        let config = test_config();
        let user_id = Uuid::new_v4();

        let (access, _) = config.generate_access_token(user_id, "viewer").unwrap();
        let (refresh, _) = config
            .generate_refresh_token(user_id, "viewer", Uuid::new_v4())
            .unwrap();

        // Different secrets: the signature check fails before the type check.
        assert!(config.validate_refresh_token(&access).is_err());
        assert!(config.validate_access_token(&refresh).is_err());
    }

    #[test]
    fn test_issue_pair_reports_access_ttl() {
        let config = test_config();
        let tokens = config
            .issue_pair(Uuid::new_v4(), "admin", Uuid::new_v4())
            .unwrap();

        assert_eq!(tokens.expires_in, 900);
        assert!(config.validate_access_token(&tokens.access_token).is_ok());
        assert!(config.validate_refresh_token(&tokens.refresh_token).is_ok());
    }

    #[test]
    fn test_expired_access_token() {
        let mut config = test_config();
        config.access_token_expiry_secs = 1;

        let (token, _) = config.generate_access_token(Uuid::new_v4(), "admin").unwrap();
        sleep(StdDuration::from_secs(2));

        let result = config.validate_access_token(&token);
        assert!(
            matches!(result, Err(JwtError::TokenExpired)),
            "Expected TokenExpired, got: {:?}",
            result
        );
    }

    #[test]
    fn test_garbage_token_rejected() {
        let config = test_config();
        assert!(config.validate_access_token("not_a_jwt").is_err());
        assert!(config.validate_refresh_token("a.b.c").is_err());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let result = JwtConfig::new("", "refresh", 900, 604800, 30);
        assert!(matches!(result, Err(JwtError::InvalidKey(_))));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", test_config());
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("access_secret_for_unit_tests"));
    }
}
