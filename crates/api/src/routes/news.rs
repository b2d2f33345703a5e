//! News article management for signed-in console users.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use domain::models::news_post::{AdminNewsQuery, CreateNewsRequest, UpdateNewsRequest};
use domain::models::{NewsPost, SuccessResponse};
use domain::services::publishing::determine_published_at;
use domain::services::slug::normalize_slug;
use persistence::repositories::{NewNewsPost, NewsChanges, NewsFilter, NewsRepository};
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{UserAuth, ValidJson};

const NOT_FOUND: &str = "News article not found";

/// Mounted at `/api/admin/news`.
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_news).post(create_news))
        .route("/:id", get(get_news).patch(update_news).delete(delete_news))
        .route("/:id/publish", post(publish_news))
}

fn not_found() -> ApiError {
    ApiError::NotFound(NOT_FOUND.to_string())
}

/// GET /api/admin/news
pub async fn list_news(
    State(state): State<AppState>,
    Query(query): Query<AdminNewsQuery>,
) -> Result<Json<Vec<NewsPost>>, ApiError> {
    let status = query.status_filter();
    let search = query.search_pattern();
    let filter = NewsFilter {
        status: status.map(|s| s.as_str()),
        show_on_home: query.show_on_home_filter(),
        search: search.as_deref(),
    };

    let posts = NewsRepository::new(state.pool.clone())
        .list(&filter)
        .await?
        .into_iter()
        .map(NewsPost::from)
        .collect();
    Ok(Json(posts))
}

/// GET /api/admin/news/:id
pub async fn get_news(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NewsPost>, ApiError> {
    NewsRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .map(|entity| Json(NewsPost::from(entity)))
        .ok_or_else(not_found)
}

/// POST /api/admin/news
pub async fn create_news(
    State(state): State<AppState>,
    auth: UserAuth,
    ValidJson(request): ValidJson<CreateNewsRequest>,
) -> Result<(StatusCode, Json<NewsPost>), ApiError> {
    let repo = NewsRepository::new(state.pool.clone());

    let base = normalize_slug(request.slug.as_deref().unwrap_or(&request.title), "news");
    let slug = repo.unique_slug(&base, None).await?;
    let status = request.status.unwrap_or_default();
    let published_at = determine_published_at(status, request.published_at, Utc::now());

    let post = repo
        .create(&NewNewsPost {
            slug: &slug,
            title: request.title.trim(),
            excerpt: request.excerpt.as_deref(),
            body: &request.body,
            status: status.as_str(),
            published_at,
            show_on_home: request.show_on_home.unwrap_or(false),
            home_display_order: request.home_display_order.unwrap_or(0),
            hero_image_url: request.hero_image_url.as_deref(),
            hero_media_id: request.hero_media_id,
            author_id: Some(request.author_id.unwrap_or(auth.user_id)),
            reading_time: request.reading_time.as_deref(),
        })
        .await?;

    info!(news_id = %post.id, slug = %post.slug, status = %status, "News article created");
    Ok((StatusCode::CREATED, Json(NewsPost::from(post))))
}

/// PATCH /api/admin/news/:id
///
/// A status change recomputes the publish date from `publishedAt`.
pub async fn update_news(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidJson(request): ValidJson<UpdateNewsRequest>,
) -> Result<Json<NewsPost>, ApiError> {
    let repo = NewsRepository::new(state.pool.clone());
    if repo.find_by_id(id).await?.is_none() {
        return Err(not_found());
    }

    let slug = match request.slug.as_deref() {
        Some(raw) => {
            let fallback_source = request.title.as_deref().unwrap_or(raw);
            let source = if raw.trim().is_empty() { fallback_source } else { raw };
            Some(repo.unique_slug(&normalize_slug(source, "news"), Some(id)).await?)
        }
        None => None,
    };

    let published_at = match request.status {
        Some(status) => Some(determine_published_at(
            status,
            request.published_at.flatten(),
            Utc::now(),
        )),
        None => request.published_at,
    };

    let changes = NewsChanges {
        slug: slug.as_deref(),
        title: request.title.as_deref().map(str::trim),
        excerpt: request.excerpt.as_deref(),
        body: request.body.as_deref(),
        status: request.status.map(|s| s.as_str()),
        published_at,
        show_on_home: request.show_on_home,
        home_display_order: request.home_display_order,
        hero_image_url: request.hero_image_url.as_deref(),
        hero_media_id: request.hero_media_id,
        author_id: request.author_id,
        reading_time: request.reading_time.as_deref(),
    };

    let post = repo.update(id, &changes).await?.ok_or_else(not_found)?;
    Ok(Json(NewsPost::from(post)))
}

/// POST /api/admin/news/:id/publish
pub async fn publish_news(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NewsPost>, ApiError> {
    let post = NewsRepository::new(state.pool.clone())
        .publish(id, Utc::now())
        .await?
        .ok_or_else(not_found)?;

    info!(news_id = %id, "News article published");
    Ok(Json(NewsPost::from(post)))
}

/// DELETE /api/admin/news/:id
pub async fn delete_news(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let removed = NewsRepository::new(state.pool.clone()).delete(id).await?;
    if removed == 0 {
        return Err(not_found());
    }

    info!(news_id = %id, "News article deleted");
    Ok(Json(SuccessResponse::ok()))
}
