//! Role guards for admin console routes.
//!
//! Must be layered inside `require_user_auth`, which supplies [`UserAuth`].

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use domain::models::UserRole;
use serde_json::json;

use super::user_auth::{unauthorized_response, UserAuth};

/// Editors and admins.
pub async fn require_editor(req: Request<Body>, next: Next) -> Response {
    require_role_impl(req, next, UserRole::Editor).await
}

/// Admins only.
pub async fn require_admin(req: Request<Body>, next: Next) -> Response {
    require_role_impl(req, next, UserRole::Admin).await
}

async fn require_role_impl(req: Request<Body>, next: Next, min_role: UserRole) -> Response {
    let Some(auth) = req.extensions().get::<UserAuth>() else {
        tracing::warn!("Role guard called without UserAuth in extensions");
        return unauthorized_response("Authentication required");
    };

    if !auth.has_at_least(min_role) {
        tracing::info!(
            user_id = %auth.user_id,
            role = %auth.role,
            required = %min_role,
            "Insufficient role"
        );
        return forbidden_response(&format!(
            "Insufficient permissions. Required role: {} or higher",
            min_role
        ));
    }

    next.run(req).await
}

fn forbidden_response(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": message
        })),
    )
        .into_response()
}
