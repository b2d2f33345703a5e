//! Page editing, section content and the page trash (editors and admins).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::Utc;
use domain::models::content_setting::{RetentionResponse, UpdateRetentionRequest};
use domain::models::page::{
    ensure_object_content, CreatePageRequest, CreateSectionRequest, ListPagesQuery,
    PageWithSections, RemoveSectionContentQuery, SetSectionContentRequest, TrashedPage,
    UpdatePageRequest, UpdateSectionRequest,
};
use domain::models::{Page, PageSection, PageStatus, SuccessResponse};
use domain::services::content_path::{self, ContentPath};
use domain::services::section_schema::{default_content, schema_for, validate_content};
use domain::services::slug::normalize_slug;
use persistence::repositories::{NewPage, PageChanges, PageRepository, SectionChanges};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{UserAuth, ValidJson};
use crate::services::retention::{retention_days, set_retention_days};

const PAGE_NOT_FOUND: &str = "Page not found";
const SECTION_NOT_FOUND: &str = "Section not found";

/// Mounted at `/api/admin/pages`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_pages).post(create_page))
        .route("/trash", get(list_trash))
        .route(
            "/settings/retention",
            get(get_retention).put(update_retention),
        )
        .route("/sections/:section_id", patch(update_section).delete(delete_section))
        .route(
            "/sections/:section_id/content",
            patch(set_section_content).delete(remove_section_content),
        )
        .route("/:id", get(get_page).patch(update_page).delete(delete_page))
        .route("/:id/publish", post(publish_page))
        .route("/:id/restore", post(restore_page))
        .route("/:id/sections", post(create_section))
}

/// Checks section content: always an object, and shaped like its schema
/// when the key has one.
fn check_section_content(key: &str, content: &Value) -> Result<(), ApiError> {
    ensure_object_content(content).map_err(ApiError::Validation)?;
    if let Some(schema) = schema_for(key) {
        validate_content(schema, content)?;
    }
    Ok(())
}

/// Starting content for a new section when the request leaves it out.
fn initial_content(key: &str) -> Value {
    schema_for(key)
        .map(default_content)
        .unwrap_or_else(|| Value::Object(Default::default()))
}

async fn load_page_with_sections(
    repo: &PageRepository,
    id: Uuid,
) -> Result<PageWithSections, ApiError> {
    let page = repo
        .find_by_id(id)
        .await?
        .map(Page::from)
        .ok_or_else(|| ApiError::NotFound(PAGE_NOT_FOUND.to_string()))?;
    let sections = repo
        .list_sections(id, false)
        .await?
        .into_iter()
        .map(PageSection::from)
        .collect();
    Ok(PageWithSections { page, sections })
}

/// GET /api/admin/pages
pub async fn list_pages(
    State(state): State<AppState>,
    Query(query): Query<ListPagesQuery>,
) -> Result<Json<Vec<Page>>, ApiError> {
    let slug = query
        .slug
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let pages = PageRepository::new(state.pool.clone())
        .list(slug)
        .await?
        .into_iter()
        .map(Page::from)
        .collect();
    Ok(Json(pages))
}

/// GET /api/admin/pages/:id
pub async fn get_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PageWithSections>, ApiError> {
    let repo = PageRepository::new(state.pool.clone());
    Ok(Json(load_page_with_sections(&repo, id).await?))
}

/// POST /api/admin/pages
pub async fn create_page(
    State(state): State<AppState>,
    auth: UserAuth,
    ValidJson(request): ValidJson<CreatePageRequest>,
) -> Result<(StatusCode, Json<Page>), ApiError> {
    let slug = normalize_slug(&request.slug, "page");
    let page = PageRepository::new(state.pool.clone())
        .create(&NewPage {
            slug: &slug,
            title: request.title.trim(),
            excerpt: request.excerpt.as_deref(),
            seo_title: request.seo_title.as_deref(),
            seo_description: request.seo_description.as_deref(),
            seo_metadata: request.seo_metadata.as_ref(),
            featured_media_id: request.featured_media_id,
        })
        .await?;

    info!(page_id = %page.id, slug = %page.slug, user_id = %auth.user_id, "Page created");
    Ok((StatusCode::CREATED, Json(Page::from(page))))
}

/// PATCH /api/admin/pages/:id
pub async fn update_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidJson(request): ValidJson<UpdatePageRequest>,
) -> Result<Json<Page>, ApiError> {
    let slug = request.slug.as_deref().map(|s| normalize_slug(s, "page"));
    let changes = PageChanges {
        slug: slug.as_deref(),
        title: request.title.as_deref().map(str::trim),
        excerpt: request.excerpt.as_deref(),
        status: request.status.map(|s| s.as_str()),
        seo_title: request.seo_title.as_deref(),
        seo_description: request.seo_description.as_deref(),
        seo_metadata: request.seo_metadata.as_ref(),
        featured_media_id: request.featured_media_id,
    };

    let page = PageRepository::new(state.pool.clone())
        .update(id, &changes)
        .await?
        .ok_or_else(|| ApiError::NotFound(PAGE_NOT_FOUND.to_string()))?;
    Ok(Json(Page::from(page)))
}

/// POST /api/admin/pages/:id/publish
///
/// Publishes the page and every live section on it.
pub async fn publish_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PageWithSections>, ApiError> {
    let repo = PageRepository::new(state.pool.clone());
    repo.publish(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(PAGE_NOT_FOUND.to_string()))?;

    info!(page_id = %id, "Page published");
    Ok(Json(load_page_with_sections(&repo, id).await?))
}

/// DELETE /api/admin/pages/:id
pub async fn delete_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let moved = PageRepository::new(state.pool.clone())
        .soft_delete(id, Utc::now())
        .await?;
    if !moved {
        return Err(ApiError::NotFound(PAGE_NOT_FOUND.to_string()));
    }

    info!(page_id = %id, "Page moved to trash");
    Ok(Json(SuccessResponse::ok()))
}

/// GET /api/admin/pages/trash
pub async fn list_trash(State(state): State<AppState>) -> Result<Json<Vec<TrashedPage>>, ApiError> {
    let days = retention_days(&state.pool, state.config.content.trash_retention_days).await?;
    let pages = PageRepository::new(state.pool.clone())
        .list_trash()
        .await?
        .into_iter()
        .map(|entity| TrashedPage::new(Page::from(entity), days))
        .collect();
    Ok(Json(pages))
}

/// POST /api/admin/pages/:id/restore
pub async fn restore_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Page>, ApiError> {
    let page = PageRepository::new(state.pool.clone())
        .restore(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Page not found in trash".to_string()))?;

    info!(page_id = %id, "Page restored from trash");
    Ok(Json(Page::from(page)))
}

/// GET /api/admin/pages/settings/retention
pub async fn get_retention(
    State(state): State<AppState>,
) -> Result<Json<RetentionResponse>, ApiError> {
    let days = retention_days(&state.pool, state.config.content.trash_retention_days).await?;
    Ok(Json(RetentionResponse { days }))
}

/// PUT /api/admin/pages/settings/retention
pub async fn update_retention(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<UpdateRetentionRequest>,
) -> Result<Json<RetentionResponse>, ApiError> {
    let days = set_retention_days(&state.pool, request.days).await?;
    info!(days, "Trash retention updated");
    Ok(Json(RetentionResponse { days }))
}

/// POST /api/admin/pages/:id/sections
pub async fn create_section(
    State(state): State<AppState>,
    Path(page_id): Path<Uuid>,
    ValidJson(request): ValidJson<CreateSectionRequest>,
) -> Result<(StatusCode, Json<PageSection>), ApiError> {
    let key = request.key.trim();
    let content = request.content.unwrap_or_else(|| initial_content(key));
    check_section_content(key, &content)?;

    let repo = PageRepository::new(state.pool.clone());
    if repo.find_by_id(page_id).await?.is_none() {
        return Err(ApiError::NotFound(PAGE_NOT_FOUND.to_string()));
    }

    let status = request.status.unwrap_or_default();
    let section = repo
        .create_section(
            page_id,
            key,
            request.display_order,
            &content,
            status.as_str(),
        )
        .await?;

    info!(page_id = %page_id, section_id = %section.id, key = %key, "Section created");
    Ok((StatusCode::CREATED, Json(PageSection::from(section))))
}

/// PATCH /api/admin/pages/sections/:section_id
pub async fn update_section(
    State(state): State<AppState>,
    Path(section_id): Path<Uuid>,
    ValidJson(request): ValidJson<UpdateSectionRequest>,
) -> Result<Json<PageSection>, ApiError> {
    let repo = PageRepository::new(state.pool.clone());
    let current = repo
        .find_section(section_id)
        .await?
        .map(PageSection::from)
        .ok_or_else(|| ApiError::NotFound(SECTION_NOT_FOUND.to_string()))?;

    let key = request.key.as_deref().map(str::trim);
    if key.is_some() || request.content.is_some() {
        let effective_key = key.unwrap_or(&current.key);
        let effective_content = request.content.as_ref().unwrap_or(&current.content);
        check_section_content(effective_key, effective_content)?;
    }

    let changes = SectionChanges {
        key,
        display_order: request.display_order,
        content: request.content.as_ref(),
        status: request.status.map(|s: PageStatus| s.as_str()),
    };
    let section = repo
        .update_section(section_id, &changes)
        .await?
        .ok_or_else(|| ApiError::NotFound(SECTION_NOT_FOUND.to_string()))?;
    Ok(Json(PageSection::from(section)))
}

/// PATCH /api/admin/pages/sections/:section_id/content
///
/// Writes one value inside the stored content, creating intermediate
/// objects and arrays as needed. The row is locked for the read-modify-write
/// so concurrent edits to different paths all land.
pub async fn set_section_content(
    State(state): State<AppState>,
    Path(section_id): Path<Uuid>,
    ValidJson(request): ValidJson<SetSectionContentRequest>,
) -> Result<Json<PageSection>, ApiError> {
    let path = request.path.to_content_path()?;
    let value = request.value;

    let section = PageRepository::new(state.pool.clone())
        .edit_section_content(section_id, |current| {
            let mut content = current.content.clone();
            content_path::set(&mut content, &path, value)?;
            check_section_content(&current.key, &content)?;
            Ok::<_, ApiError>(content)
        })
        .await?
        .ok_or_else(|| ApiError::NotFound(SECTION_NOT_FOUND.to_string()))?;

    info!(section_id = %section_id, path = %path, "Section content updated");
    Ok(Json(PageSection::from(section)))
}

/// DELETE /api/admin/pages/sections/:section_id/content?path=...
///
/// Removes one value from the stored content. Later array elements shift
/// down. The result must still satisfy the section's schema.
pub async fn remove_section_content(
    State(state): State<AppState>,
    Path(section_id): Path<Uuid>,
    Query(query): Query<RemoveSectionContentQuery>,
) -> Result<Json<PageSection>, ApiError> {
    let path = ContentPath::parse(query.path.trim())?;

    let section = PageRepository::new(state.pool.clone())
        .edit_section_content(section_id, |current| {
            let mut content = current.content.clone();
            if content_path::remove(&mut content, &path).is_none() {
                return Err(ApiError::NotFound(format!("Nothing stored at '{}'", path)));
            }
            check_section_content(&current.key, &content)?;
            Ok(content)
        })
        .await?
        .ok_or_else(|| ApiError::NotFound(SECTION_NOT_FOUND.to_string()))?;

    info!(section_id = %section_id, path = %path, "Section content removed");
    Ok(Json(PageSection::from(section)))
}

/// DELETE /api/admin/pages/sections/:section_id
pub async fn delete_section(
    State(state): State<AppState>,
    Path(section_id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let removed = PageRepository::new(state.pool.clone())
        .delete_section(section_id)
        .await?;
    if removed == 0 {
        return Err(ApiError::NotFound(SECTION_NOT_FOUND.to_string()));
    }

    info!(section_id = %section_id, "Section deleted");
    Ok(Json(SuccessResponse::ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_free_form_keys_accept_any_object() {
        assert!(check_section_content("custom_block", &json!({"anything": [1, 2]})).is_ok());
        assert!(check_section_content("custom_block", &json!({})).is_ok());
    }

    #[test]
    fn test_non_object_content_rejected() {
        let err = check_section_content("custom_block", &json!(["a"])).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_initial_content_follows_schema() {
        let hero = initial_content("hero_slides");
        assert!(check_section_content("hero_slides", &hero).is_ok());
        assert_eq!(hero["slides"].as_array().map(Vec::len), Some(1));
        assert_eq!(initial_content("custom_block"), json!({}));
    }

    #[test]
    fn test_known_key_is_validated() {
        let err = check_section_content("hero_slides", &json!({"slides": "not a list"})).unwrap_err();
        assert!(matches!(err, ApiError::InvalidFields(_, _)));
    }
}
