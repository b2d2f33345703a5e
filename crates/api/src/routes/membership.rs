//! Membership application intake and review.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use chrono::Utc;
use domain::models::membership_application::{
    ApplicationListResponse, ApplicationResponse, CreateMembershipApplicationRequest,
    ListApplicationsQuery, UpdateMembershipStatusRequest,
};
use domain::models::{MembershipApplication, SuccessResponse};
use persistence::repositories::MembershipRepository;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidJson;
use crate::middleware::metrics::record_membership_submitted;
use crate::middleware::rate_limit_middleware;
use crate::services::notifications::notify_membership_submission;

const APPLICATIONS: &str = "/membership/applications";
const APPLICATION: &str = "/membership/applications/:id";

/// Public submission endpoint, rate limited.
pub fn public_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(APPLICATIONS, post(submit_application))
        .route_layer(middleware::from_fn_with_state(state, rate_limit_middleware))
}

/// Listing and detail, editors and admins.
pub fn editor_router() -> Router<AppState> {
    Router::new()
        .route(APPLICATIONS, get(list_applications))
        .route(APPLICATION, get(get_application))
}

/// Status review, admins only.
pub fn admin_router() -> Router<AppState> {
    Router::new().route("/membership/applications/:id/status", patch(update_status))
}

/// POST /api/membership/applications
///
/// A second submission of the same payment returns the stored application.
pub async fn submit_application(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<CreateMembershipApplicationRequest>,
) -> Result<Response, ApiError> {
    request.validate_amount().map_err(ApiError::Validation)?;

    let repo = MembershipRepository::new(state.pool.clone());

    if let Some(existing) = repo
        .find_by_payment_references(&request.duplicate_candidates())
        .await?
    {
        let application = MembershipApplication::from(existing);
        info!(application_id = %application.id, "Duplicate membership submission ignored");
        return Ok(Json(ApplicationResponse {
            success: true,
            message: Some("Application already exists for this payment reference".to_string()),
            application,
        })
        .into_response());
    }

    let new_application = request.into_new_application(Utc::now());
    let application = MembershipApplication::from(repo.create(&new_application).await?);

    record_membership_submitted();
    info!(
        application_id = %application.id,
        tier = %application.membership_tier,
        gateway = %application.payment_gateway,
        "Membership application submitted"
    );

    let pool = state.pool.clone();
    let email = state.email.clone();
    let notified = application.clone();
    tokio::spawn(async move {
        notify_membership_submission(pool, &email, &notified).await;
    });

    Ok((
        StatusCode::CREATED,
        Json(ApplicationResponse {
            success: true,
            message: Some("Application submitted successfully".to_string()),
            application,
        }),
    )
        .into_response())
}

/// GET /api/membership/applications
pub async fn list_applications(
    State(state): State<AppState>,
    Query(query): Query<ListApplicationsQuery>,
) -> Result<Json<ApplicationListResponse>, ApiError> {
    let status = query.status_filter();
    let applications = MembershipRepository::new(state.pool.clone())
        .list(status.map(|s| s.as_str()))
        .await?
        .into_iter()
        .map(MembershipApplication::from)
        .collect();

    Ok(Json(ApplicationListResponse {
        success: true,
        applications,
    }))
}

/// GET /api/membership/applications/:id
pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let found = MembershipRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?;

    let response = match found {
        Some(entity) => Json(ApplicationResponse {
            success: true,
            message: None,
            application: entity.into(),
        })
        .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(SuccessResponse::failed("Application not found")),
        )
            .into_response(),
    };
    Ok(response)
}

/// PATCH /api/membership/applications/:id/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidJson(request): ValidJson<UpdateMembershipStatusRequest>,
) -> Result<Json<ApplicationResponse>, ApiError> {
    let repo = MembershipRepository::new(state.pool.clone());
    let current = repo
        .find_by_id(id)
        .await?
        .map(MembershipApplication::from)
        .ok_or_else(|| ApiError::NotFound("Application not found".to_string()))?;

    if current.status != request.status && !current.status.can_transition_to(request.status) {
        return Err(ApiError::Validation(format!(
            "Invalid status transition from {} to {}",
            current.status, request.status
        )));
    }

    let notes = request.notes.as_deref().map(str::trim);
    let application = repo
        .update_status(id, request.status.as_str(), notes)
        .await?
        .map(MembershipApplication::from)
        .ok_or_else(|| ApiError::NotFound("Application not found".to_string()))?;

    info!(
        application_id = %id,
        from = %current.status,
        to = %application.status,
        "Membership application status updated"
    );
    Ok(Json(ApplicationResponse {
        success: true,
        message: None,
        application,
    }))
}
