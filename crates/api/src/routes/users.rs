//! Console user management (admins) and the caller's own profile.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use domain::models::user::{
    normalize_email, ChangePasswordRequest, CreateUserRequest, UpdateProfileRequest,
    UpdateUserRequest, UserResponse,
};
use domain::models::{SuccessResponse, User};
use persistence::repositories::{UserChanges, UserRepository};
use shared::crypto::generate_temporary_password;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{UserAuth, ValidJson};
use crate::services::notifications::invite_message;

const TEMPORARY_PASSWORD_LEN: usize = 12;
const LAST_ADMIN_MESSAGE: &str = "At least one active admin user is required.";

/// Mounted at `/api/admin/users`, admin only.
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", patch(update_user))
        .route("/:id/resend-invite", post(resend_invite))
}

/// Mounted at `/api/admin/me`, any signed-in user.
pub fn profile_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile).patch(update_profile))
        .route("/password", patch(change_password))
}

async fn load_user(repo: &UserRepository, id: Uuid) -> Result<User, ApiError> {
    repo.find_by_id(id)
        .await?
        .map(User::from)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

async fn send_invite(state: &AppState, user: &User, password: &str) -> bool {
    let message = invite_message(
        &user.first_name,
        &user.email,
        password,
        &state.config.server.frontend_url,
    );
    state.email.send_logged("user_invite", &message).await
}

/// GET /api/admin/users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = UserRepository::new(state.pool.clone()).list().await?;
    Ok(Json(
        users
            .into_iter()
            .map(|u| UserResponse::from(User::from(u)))
            .collect(),
    ))
}

/// POST /api/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    auth: UserAuth,
    ValidJson(request): ValidJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let email = normalize_email(&request.email);

    if repo.find_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict("Email already in use".to_string()));
    }

    let password_hash = state.auth_service().hash_password(&request.password)?;
    let role = request.role.unwrap_or_default();
    let user = User::from(
        repo.create(
            request.first_name.trim(),
            request.last_name.trim(),
            &email,
            &password_hash,
            role.as_str(),
        )
        .await?,
    );

    info!(user_id = %user.id, role = %user.role, created_by = %auth.user_id, "User created");

    if request.send_invite {
        send_invite(&state, &user, &request.password).await;
    }

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// PATCH /api/admin/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidJson(request): ValidJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let current = load_user(&repo, id).await?;

    if request.is_empty() {
        return Ok(Json(UserResponse::from(current)));
    }

    if request.removes_admin(&current) && repo.count_other_active_admins(id).await? == 0 {
        return Err(ApiError::Validation(LAST_ADMIN_MESSAGE.to_string()));
    }

    let email = request.email.as_deref().map(normalize_email);
    if let Some(email) = &email {
        if repo.email_taken_by_other(email, id).await? {
            return Err(ApiError::Conflict("Email already in use".to_string()));
        }
    }

    let password_hash = match &request.password {
        Some(password) => Some(state.auth_service().hash_password(password)?),
        None => None,
    };

    let changes = UserChanges {
        first_name: request.first_name.as_deref().map(str::trim),
        last_name: request.last_name.as_deref().map(str::trim),
        email: email.as_deref(),
        role: request.role.map(|r| r.as_str()),
        is_active: request.is_active,
        password_hash: password_hash.as_deref(),
    };

    let user = repo
        .update(id, &changes)
        .await?
        .map(User::from)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if request.is_active == Some(false) || password_hash.is_some() {
        repo.delete_sessions_for_user(id).await?;
    }

    info!(user_id = %id, "User updated");
    Ok(Json(UserResponse::from(user)))
}

/// POST /api/admin/users/:id/resend-invite
///
/// Sets a new temporary password and mails it.
pub async fn resend_invite(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let user = load_user(&repo, id).await?;

    let temporary_password = generate_temporary_password(TEMPORARY_PASSWORD_LEN);
    let password_hash = state.auth_service().hash_password(&temporary_password)?;
    repo.update_password(id, &password_hash).await?;

    send_invite(&state, &user, &temporary_password).await;
    info!(user_id = %id, "Invitation resent");
    Ok(Json(SuccessResponse::ok()))
}

/// GET /api/admin/me
pub async fn get_profile(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<UserResponse>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    Ok(Json(UserResponse::from(load_user(&repo, auth.user_id).await?)))
}

/// PATCH /api/admin/me
pub async fn update_profile(
    State(state): State<AppState>,
    auth: UserAuth,
    ValidJson(request): ValidJson<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());

    let email = request.email.as_deref().map(normalize_email);
    if let Some(email) = &email {
        if repo.email_taken_by_other(email, auth.user_id).await? {
            return Err(ApiError::Validation("Email already in use".to_string()));
        }
    }

    let changes = UserChanges {
        first_name: request.first_name.as_deref().map(str::trim),
        last_name: request.last_name.as_deref().map(str::trim),
        email: email.as_deref(),
        ..UserChanges::default()
    };

    let user = repo
        .update(auth.user_id, &changes)
        .await?
        .map(User::from)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    Ok(Json(UserResponse::from(user)))
}

/// PATCH /api/admin/me/password
pub async fn change_password(
    State(state): State<AppState>,
    auth: UserAuth,
    ValidJson(request): ValidJson<ChangePasswordRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let user = load_user(&repo, auth.user_id).await?;
    let auth_service = state.auth_service();

    if !auth_service.verify_password(&request.current_password, &user.password_hash)? {
        return Err(ApiError::Validation(
            "Current password is incorrect".to_string(),
        ));
    }

    let password_hash = auth_service.hash_password(&request.new_password)?;
    repo.update_password(user.id, &password_hash).await?;

    info!(user_id = %user.id, "Password changed");
    Ok(Json(SuccessResponse::ok()))
}
