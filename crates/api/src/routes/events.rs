//! Event management for signed-in console users.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use domain::models::event::{cover_file_name, CreateEventRequest, UpdateEventRequest};
use domain::models::{Event, EventStatus, SuccessResponse};
use domain::services::slug::normalize_slug;
use persistence::repositories::{
    EventChanges, EventRepository, MediaAssetRepository, NewEvent, NewMediaAsset,
};
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{UserAuth, ValidJson};

const NOT_FOUND: &str = "Event not found";

/// Mounted at `/api/admin/events`.
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route("/:id", get(get_event).patch(update_event).delete(delete_event))
        .route("/:id/publish", post(publish_event))
}

fn not_found() -> ApiError {
    ApiError::NotFound(NOT_FOUND.to_string())
}

/// Resolves the cover to link: an explicit media id wins, otherwise a
/// cover URL is recorded as a new media asset.
async fn resolve_cover(
    state: &AppState,
    cover_media_id: Option<Uuid>,
    cover_image_url: Option<&str>,
    created_by: Uuid,
) -> Result<Option<Uuid>, ApiError> {
    if cover_media_id.is_some() {
        return Ok(cover_media_id);
    }
    let Some(url) = cover_image_url.map(str::trim).filter(|u| !u.is_empty()) else {
        return Ok(None);
    };

    let file_name = cover_file_name(url);
    let asset = MediaAssetRepository::new(state.pool.clone())
        .create(&NewMediaAsset {
            file_name: &file_name,
            url,
            alt_text: None,
            mime_type: None,
            category: Some("image"),
            created_by: Some(created_by),
        })
        .await?;
    Ok(Some(asset.id))
}

/// GET /api/admin/events
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, ApiError> {
    let events = EventRepository::new(state.pool.clone())
        .list()
        .await?
        .into_iter()
        .map(Event::from)
        .collect();
    Ok(Json(events))
}

/// GET /api/admin/events/:id
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Event>, ApiError> {
    EventRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .map(|entity| Json(Event::from(entity)))
        .ok_or_else(not_found)
}

/// POST /api/admin/events
pub async fn create_event(
    State(state): State<AppState>,
    auth: UserAuth,
    ValidJson(request): ValidJson<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    request.validate_dates().map_err(ApiError::Validation)?;

    let repo = EventRepository::new(state.pool.clone());
    let base = normalize_slug(request.slug.as_deref().unwrap_or(&request.title), "event");
    let slug = repo.unique_slug(&base, None).await?;
    let cover_media_id = resolve_cover(
        &state,
        request.cover_media_id,
        request.cover_image_url.as_deref(),
        auth.user_id,
    )
    .await?;
    let status = request.status.unwrap_or(EventStatus::Draft);

    let event = repo
        .create(&NewEvent {
            slug: &slug,
            title: request.title.trim(),
            description: request.description.as_deref(),
            status: status.as_str(),
            start_date: request.start_date,
            end_date: request.end_date,
            location: request.location.as_deref(),
            category: request.category.as_deref(),
            cover_media_id,
        })
        .await?;

    info!(event_id = %event.id, slug = %event.slug, "Event created");
    Ok((StatusCode::CREATED, Json(Event::from(event))))
}

/// PATCH /api/admin/events/:id
pub async fn update_event(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
    ValidJson(request): ValidJson<UpdateEventRequest>,
) -> Result<Json<Event>, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    let current = repo
        .find_by_id(id)
        .await?
        .map(Event::from)
        .ok_or_else(not_found)?;
    request
        .validate_dates_against(&current)
        .map_err(ApiError::Validation)?;

    let slug = match request.slug.as_deref() {
        Some(raw) => {
            let source = if raw.trim().is_empty() { &current.title } else { raw };
            Some(repo.unique_slug(&normalize_slug(source, "event"), Some(id)).await?)
        }
        None => None,
    };
    let cover_media_id = resolve_cover(
        &state,
        request.cover_media_id,
        request.cover_image_url.as_deref(),
        auth.user_id,
    )
    .await?;

    let changes = EventChanges {
        slug: slug.as_deref(),
        title: request.title.as_deref().map(str::trim),
        description: request.description.as_deref(),
        status: request.status.map(|s| s.as_str()),
        start_date: request.start_date,
        end_date: request.end_date,
        location: request.location.as_deref(),
        category: request.category.as_deref(),
        cover_media_id,
    };

    let event = repo.update(id, &changes).await?.ok_or_else(not_found)?;
    Ok(Json(Event::from(event)))
}

/// POST /api/admin/events/:id/publish
pub async fn publish_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Event>, ApiError> {
    let event = EventRepository::new(state.pool.clone())
        .publish(id)
        .await?
        .ok_or_else(not_found)?;

    info!(event_id = %id, "Event published");
    Ok(Json(Event::from(event)))
}

/// DELETE /api/admin/events/:id
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let removed = EventRepository::new(state.pool.clone()).delete(id).await?;
    if removed == 0 {
        return Err(not_found());
    }

    info!(event_id = %id, "Event deleted");
    Ok(Json(SuccessResponse::ok()))
}
