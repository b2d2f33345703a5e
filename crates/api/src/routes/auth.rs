//! Authentication routes: login, token refresh, logout and password reset.

use axum::{extract::State, middleware, routing::post, Json, Router};
use domain::models::auth::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, ResetPasswordRequest, TokenResponse,
};
use domain::models::password_reset::FORGOT_PASSWORD_MESSAGE;
use domain::models::SuccessResponse;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{BearerToken, ClientInfo, ValidJson};
use crate::middleware::rate_limit_middleware;
use crate::services::notifications::password_reset_message;

pub fn router(state: AppState) -> Router<AppState> {
    let limited = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
        .route_layer(middleware::from_fn_with_state(state, rate_limit_middleware));

    Router::new()
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
        .merge(limited)
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    client: ClientInfo,
    ValidJson(request): ValidJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let response = state
        .auth_service()
        .login(&request.email, &request.password, &client)
        .await?;
    Ok(Json(response))
}

/// POST /api/auth/refresh with the refresh token as bearer.
pub async fn refresh(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<TokenResponse>, ApiError> {
    let response = state.auth_service().refresh(&token).await?;
    Ok(Json(response))
}

/// POST /api/auth/logout with the refresh token as bearer.
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.auth_service().logout(&token).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// POST /api/auth/forgot-password
///
/// Answers identically whether or not the address belongs to a user.
pub async fn forgot_password(
    State(state): State<AppState>,
    client: ClientInfo,
    ValidJson(request): ValidJson<ForgotPasswordRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if let Some(issued) = state
        .auth_service()
        .request_password_reset(&request.email, &client)
        .await?
    {
        let message =
            password_reset_message(&issued.user.first_name, &issued.user.email, &issued.code);
        state.email.send_logged("password_reset", &message).await;
    }

    Ok(Json(SuccessResponse::with_message(FORGOT_PASSWORD_MESSAGE)))
}

/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<ResetPasswordRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .auth_service()
        .reset_password(&request.email, &request.code, &request.new_password)
        .await?;
    Ok(Json(SuccessResponse::ok()))
}
