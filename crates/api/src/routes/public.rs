//! Unauthenticated content for the public site.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use domain::models::news_post::{NewsSummary, PublicNewsQuery};
use domain::models::page::PageWithSections;
use domain::models::{Event, NewsPost, Page, PageSection, SiteRoute};
use persistence::repositories::{EventRepository, NewsRepository, PageRepository, SiteRouteRepository};

use crate::app::AppState;
use crate::error::ApiError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pages", get(list_routes))
        .route("/pages/:slug", get(get_page))
        .route("/news", get(list_news))
        .route("/news/:slug", get(get_news))
        .route("/events", get(list_events))
}

/// GET /api/pages
///
/// The active route table, ordered by slug.
pub async fn list_routes(State(state): State<AppState>) -> Result<Json<Vec<SiteRoute>>, ApiError> {
    let routes = SiteRouteRepository::new(state.pool.clone())
        .list_active()
        .await?
        .into_iter()
        .map(SiteRoute::from)
        .collect();
    Ok(Json(routes))
}

/// GET /api/pages/:slug
pub async fn get_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PageWithSections>, ApiError> {
    let repo = PageRepository::new(state.pool.clone());
    let page = repo
        .find_published_by_slug(&slug)
        .await?
        .map(Page::from)
        .ok_or_else(|| ApiError::NotFound("Page not found".to_string()))?;
    let sections = repo
        .list_sections(page.id, true)
        .await?
        .into_iter()
        .map(PageSection::from)
        .collect();
    Ok(Json(PageWithSections { page, sections }))
}

/// GET /api/news
pub async fn list_news(
    State(state): State<AppState>,
    Query(query): Query<PublicNewsQuery>,
) -> Result<Json<Vec<NewsSummary>>, ApiError> {
    let posts = NewsRepository::new(state.pool.clone())
        .list_public(
            query.featured_only(),
            query.effective_limit(),
            Utc::now(),
        )
        .await?
        .into_iter()
        .map(NewsSummary::from)
        .collect();
    Ok(Json(posts))
}

/// GET /api/news/:slug
pub async fn get_news(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<NewsPost>, ApiError> {
    NewsRepository::new(state.pool.clone())
        .find_public_by_slug(&slug, Utc::now())
        .await?
        .map(|entity| Json(NewsPost::from(entity)))
        .ok_or_else(|| ApiError::NotFound("News article not found".to_string()))
}

/// GET /api/events
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, ApiError> {
    let events = EventRepository::new(state.pool.clone())
        .list_published()
        .await?
        .into_iter()
        .map(Event::from)
        .collect();
    Ok(Json(events))
}
