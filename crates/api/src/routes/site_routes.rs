//! Public route table management (admin only).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use domain::models::site_route::{CreateRouteRequest, UpdateRouteRequest};
use domain::models::{SiteRoute, SuccessResponse};
use persistence::repositories::SiteRouteRepository;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidJson;

/// Mounted at `/api/admin/routes`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_routes).post(create_route))
        .route("/:id", patch(update_route).delete(delete_route))
}

pub async fn list_routes(State(state): State<AppState>) -> Result<Json<Vec<SiteRoute>>, ApiError> {
    let routes = SiteRouteRepository::new(state.pool.clone())
        .list()
        .await?
        .into_iter()
        .map(SiteRoute::from)
        .collect();
    Ok(Json(routes))
}

pub async fn create_route(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<CreateRouteRequest>,
) -> Result<(StatusCode, Json<SiteRoute>), ApiError> {
    let route = SiteRouteRepository::new(state.pool.clone())
        .create(request.slug.trim(), request.target.trim(), request.is_active)
        .await?;

    info!(route_id = %route.id, slug = %route.slug, "Route created");
    Ok((StatusCode::CREATED, Json(SiteRoute::from(route))))
}

pub async fn update_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidJson(request): ValidJson<UpdateRouteRequest>,
) -> Result<Json<SiteRoute>, ApiError> {
    let route = SiteRouteRepository::new(state.pool.clone())
        .update(
            id,
            request.slug.as_deref().map(str::trim),
            request.target.as_deref().map(str::trim),
            request.is_active,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Route not found".to_string()))?;
    Ok(Json(SiteRoute::from(route)))
}

/// Deleting an unknown route succeeds.
pub async fn delete_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let removed = SiteRouteRepository::new(state.pool.clone())
        .delete(id)
        .await?;
    info!(route_id = %id, removed, "Route deleted");
    Ok(Json(SuccessResponse::ok()))
}
