//! JWT authentication for the admin console.
//!
//! `require_user_auth` validates the access token, reloads the user so that
//! deactivation and role changes apply immediately, and stores a [`UserAuth`]
//! in request extensions.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use domain::models::{User, UserRole};
use persistence::repositories::UserRepository;
use serde_json::json;
use shared::jwt::{extract_user_id, JwtError};
use uuid::Uuid;

use crate::app::AppState;
use crate::extractors::bearer_token;

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct UserAuth {
    pub user_id: Uuid,
    /// Role as currently stored, not as issued in the token.
    pub role: UserRole,
    pub email: String,
    /// Token ID of the access token used for this request.
    pub jti: String,
}

impl UserAuth {
    pub fn from_user(user: &User, jti: String) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
            email: user.email.clone(),
            jti,
        }
    }

    pub fn has_at_least(&self, role: UserRole) -> bool {
        self.role.has_at_least(role)
    }
}

/// Rejects requests without a valid access token of an active user.
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(req.headers()) else {
        return unauthorized_response("Missing or invalid Authorization header");
    };

    let claims = match state.jwt.validate_access_token(token) {
        Ok(claims) => claims,
        Err(JwtError::TokenExpired) => return unauthorized_response("Token expired"),
        Err(e) => {
            tracing::debug!(error = %e, "Access token rejected");
            return unauthorized_response("Invalid or expired token");
        }
    };

    let user_id = match extract_user_id(&claims) {
        Ok(id) => id,
        Err(_) => return unauthorized_response("Invalid or expired token"),
    };

    let user = match UserRepository::new(state.pool.clone()).find_by_id(user_id).await {
        Ok(Some(entity)) => User::from(entity),
        Ok(None) => return unauthorized_response("User not found"),
        Err(e) => {
            tracing::error!(error = %e, "Database error loading authenticated user");
            return internal_error_response("Authentication service unavailable");
        }
    };

    if !user.is_active {
        return unauthorized_response("User account is disabled");
    }

    req.extensions_mut()
        .insert(UserAuth::from_user(&user, claims.jti));
    next.run(req).await
}

pub(crate) fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

pub(crate) fn internal_error_response(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": message
        })),
    )
        .into_response()
}
