//! Public contact form.

use axum::{extract::State, middleware, routing::post, Json, Router};
use domain::models::contact::{ContactMessageRequest, CONTACT_RECEIVED_MESSAGE};
use domain::models::SuccessResponse;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidJson;
use crate::middleware::rate_limit_middleware;
use crate::services::notifications::notify_contact_message;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/contact", post(submit_contact))
        .route_layer(middleware::from_fn_with_state(state, rate_limit_middleware))
}

/// POST /api/contact
pub async fn submit_contact(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<ContactMessageRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if !notify_contact_message(&state.pool, &state.email, &request).await {
        return Err(ApiError::ServiceUnavailable(
            "Unable to send your message right now. Please try again later.".to_string(),
        ));
    }

    info!(subject = %request.subject, "Contact message forwarded");
    Ok(Json(SuccessResponse::with_message(CONTACT_RECEIVED_MESSAGE)))
}
