//! Notification recipient lists (admin only).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use domain::models::email_recipient::{
    CreateEmailRecipientRequest, RecipientEmailsResponse, RecipientListResponse,
    RecipientResponse, UpdateEmailRecipientRequest,
};
use domain::models::user::normalize_email;
use domain::models::{EmailRecipient, RecipientType, SuccessResponse};
use persistence::repositories::EmailRecipientRepository;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidJson;

const NOT_FOUND: &str = "Email recipient not found";

/// Mounted at `/api/email-recipients`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_recipients).post(create_recipient))
        .route("/membership", get(membership_emails))
        .route("/:id", put(update_recipient).delete(delete_recipient))
}

/// GET /api/email-recipients
pub async fn list_recipients(
    State(state): State<AppState>,
) -> Result<Json<RecipientListResponse>, ApiError> {
    let recipients = EmailRecipientRepository::new(state.pool.clone())
        .list()
        .await?
        .into_iter()
        .map(EmailRecipient::from)
        .collect();
    Ok(Json(RecipientListResponse {
        success: true,
        recipients,
    }))
}

/// GET /api/email-recipients/membership
pub async fn membership_emails(
    State(state): State<AppState>,
) -> Result<Json<RecipientEmailsResponse>, ApiError> {
    let emails = EmailRecipientRepository::new(state.pool.clone())
        .active_emails(RecipientType::Membership.as_str())
        .await?;
    Ok(Json(RecipientEmailsResponse {
        success: true,
        emails,
    }))
}

/// POST /api/email-recipients
pub async fn create_recipient(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<CreateEmailRecipientRequest>,
) -> Result<(StatusCode, Json<RecipientResponse>), ApiError> {
    let entity = EmailRecipientRepository::new(state.pool.clone())
        .create(
            &normalize_email(&request.email),
            request.name.as_deref().map(str::trim),
            request.recipient_type.as_str(),
            request.is_active,
            request.display_order,
        )
        .await?;

    info!(recipient_id = %entity.id, recipient_type = %request.recipient_type, "Email recipient added");
    Ok((
        StatusCode::CREATED,
        Json(RecipientResponse {
            success: true,
            recipient: entity.into(),
        }),
    ))
}

/// PUT /api/email-recipients/:id
pub async fn update_recipient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidJson(request): ValidJson<UpdateEmailRecipientRequest>,
) -> Result<Json<RecipientResponse>, ApiError> {
    let email = request.email.as_deref().map(normalize_email);
    let entity = EmailRecipientRepository::new(state.pool.clone())
        .update(
            id,
            email.as_deref(),
            request.name.as_deref().map(str::trim),
            request.recipient_type.map(|t| t.as_str()),
            request.is_active,
            request.display_order,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

    Ok(Json(RecipientResponse {
        success: true,
        recipient: entity.into(),
    }))
}

/// DELETE /api/email-recipients/:id
pub async fn delete_recipient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let removed = EmailRecipientRepository::new(state.pool.clone())
        .delete(id)
        .await?;
    if removed == 0 {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }

    info!(recipient_id = %id, "Email recipient deleted");
    Ok(Json(SuccessResponse::with_message(
        "Email recipient deleted successfully",
    )))
}
