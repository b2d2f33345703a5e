//! Outgoing email diagnostics.

use axum::{extract::State, routing::post, Json, Router};
use domain::models::contact::SendTestEmailRequest;
use domain::models::SuccessResponse;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidJson;
use crate::services::notifications::test_message;

const TEST_SENT_MESSAGE: &str = "Test email sent successfully! Please check the recipient inbox.";
const TEST_FAILED_MESSAGE: &str =
    "Failed to send test email. Please check the server logs for details.";

/// Mounted at `/api/email`, admin only.
pub fn router() -> Router<AppState> {
    Router::new().route("/test", post(send_test_email))
}

/// POST /api/email/test
pub async fn send_test_email(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<SendTestEmailRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let sender = &state.config.email.sender_email;
    let message = test_message(request.to.trim(), request.subject_or_default(), sender);

    let response = if state.email.send_logged("test", &message).await {
        SuccessResponse::with_message(TEST_SENT_MESSAGE)
    } else {
        SuccessResponse::failed(TEST_FAILED_MESSAGE)
    };
    Ok(Json(response))
}
