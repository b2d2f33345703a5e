//! Page, section and trash repository.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{PageEntity, PageSectionEntity};
use crate::metrics::QueryTimer;

const PAGE_COLUMNS: &str = "id, slug, title, excerpt, status, seo_title, seo_description, \
                            seo_metadata, featured_media_id, deleted_at, created_at, updated_at";

const SECTION_COLUMNS: &str =
    "id, page_id, key, display_order, status, content, deleted_at, created_at, updated_at";

/// Columns for a new page.
#[derive(Debug, Clone)]
pub struct NewPage<'a> {
    pub slug: &'a str,
    pub title: &'a str,
    pub excerpt: Option<&'a str>,
    pub seo_title: Option<&'a str>,
    pub seo_description: Option<&'a str>,
    pub seo_metadata: Option<&'a Value>,
    pub featured_media_id: Option<Uuid>,
}

/// Partial page update. `None` keeps the stored value.
#[derive(Debug, Default, Clone)]
pub struct PageChanges<'a> {
    pub slug: Option<&'a str>,
    pub title: Option<&'a str>,
    pub excerpt: Option<&'a str>,
    pub status: Option<&'a str>,
    pub seo_title: Option<&'a str>,
    pub seo_description: Option<&'a str>,
    pub seo_metadata: Option<&'a Value>,
    pub featured_media_id: Option<Uuid>,
}

/// Partial section update. `None` keeps the stored value.
#[derive(Debug, Default, Clone)]
pub struct SectionChanges<'a> {
    pub key: Option<&'a str>,
    pub display_order: Option<i32>,
    pub content: Option<&'a Value>,
    pub status: Option<&'a str>,
}

#[derive(Clone)]
pub struct PageRepository {
    pool: PgPool,
}

impl PageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Pages not in the trash, most recently edited first.
    pub async fn list(&self, slug: Option<&str>) -> Result<Vec<PageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_pages");
        let result = sqlx::query_as::<_, PageEntity>(&format!(
            r#"
            SELECT {} FROM pages
            WHERE deleted_at IS NULL AND ($1::text IS NULL OR slug = $1)
            ORDER BY updated_at DESC
            "#,
            PAGE_COLUMNS
        ))
        .bind(slug)
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }

    /// A page that is not in the trash.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_page_by_id");
        let result = sqlx::query_as::<_, PageEntity>(&format!(
            "SELECT {} FROM pages WHERE id = $1 AND deleted_at IS NULL",
            PAGE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    /// A published page for the public site.
    pub async fn find_published_by_slug(&self, slug: &str) -> Result<Option<PageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_published_page_by_slug");
        let result = sqlx::query_as::<_, PageEntity>(&format!(
            r#"
            SELECT {} FROM pages
            WHERE slug = $1 AND status = 'published' AND deleted_at IS NULL
            "#,
            PAGE_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn create(&self, page: &NewPage<'_>) -> Result<PageEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_page");
        let result = sqlx::query_as::<_, PageEntity>(&format!(
            r#"
            INSERT INTO pages (slug, title, excerpt, seo_title, seo_description, seo_metadata,
                               featured_media_id, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'draft')
            RETURNING {}
            "#,
            PAGE_COLUMNS
        ))
        .bind(page.slug)
        .bind(page.title)
        .bind(page.excerpt)
        .bind(page.seo_title)
        .bind(page.seo_description)
        .bind(page.seo_metadata)
        .bind(page.featured_media_id)
        .fetch_one(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn update(
        &self,
        id: Uuid,
        changes: &PageChanges<'_>,
    ) -> Result<Option<PageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_page");
        let result = sqlx::query_as::<_, PageEntity>(&format!(
            r#"
            UPDATE pages
            SET slug = COALESCE($2, slug),
                title = COALESCE($3, title),
                excerpt = COALESCE($4, excerpt),
                status = COALESCE($5, status),
                seo_title = COALESCE($6, seo_title),
                seo_description = COALESCE($7, seo_description),
                seo_metadata = COALESCE($8, seo_metadata),
                featured_media_id = COALESCE($9, featured_media_id)
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {}
            "#,
            PAGE_COLUMNS
        ))
        .bind(id)
        .bind(changes.slug)
        .bind(changes.title)
        .bind(changes.excerpt)
        .bind(changes.status)
        .bind(changes.seo_title)
        .bind(changes.seo_description)
        .bind(changes.seo_metadata)
        .bind(changes.featured_media_id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Publish a page together with all of its live sections.
    pub async fn publish(&self, id: Uuid) -> Result<Option<PageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("publish_page");
        timer.finish(self.publish_in_tx(id).await)
    }

    async fn publish_in_tx(&self, id: Uuid) -> Result<Option<PageEntity>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let page = sqlx::query_as::<_, PageEntity>(&format!(
            r#"
            UPDATE pages SET status = 'published'
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {}
            "#,
            PAGE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        if page.is_some() {
            sqlx::query(
                r#"
                UPDATE page_sections SET status = 'published'
                WHERE page_id = $1 AND deleted_at IS NULL
                "#,
            )
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(page)
    }

    /// Move a page and its sections to the trash.
    pub async fn soft_delete(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("soft_delete_page");
        timer.finish(self.soft_delete_in_tx(id, now).await)
    }

    async fn soft_delete_in_tx(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let affected = sqlx::query(
            "UPDATE pages SET deleted_at = $2 WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if affected > 0 {
            sqlx::query(
                "UPDATE page_sections SET deleted_at = $2 WHERE page_id = $1 AND deleted_at IS NULL",
            )
            .bind(id)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(affected > 0)
    }

    /// Pages in the trash, most recently deleted first.
    pub async fn list_trash(&self) -> Result<Vec<PageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_trashed_pages");
        let result = sqlx::query_as::<_, PageEntity>(&format!(
            "SELECT {} FROM pages WHERE deleted_at IS NOT NULL ORDER BY deleted_at DESC",
            PAGE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Take a page and its sections back out of the trash.
    pub async fn restore(&self, id: Uuid) -> Result<Option<PageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("restore_page");
        timer.finish(self.restore_in_tx(id).await)
    }

    async fn restore_in_tx(&self, id: Uuid) -> Result<Option<PageEntity>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let page = sqlx::query_as::<_, PageEntity>(&format!(
            r#"
            UPDATE pages SET deleted_at = NULL
            WHERE id = $1 AND deleted_at IS NOT NULL
            RETURNING {}
            "#,
            PAGE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        if page.is_some() {
            sqlx::query("UPDATE page_sections SET deleted_at = NULL WHERE page_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(page)
    }

    /// Permanently remove pages trashed before `cutoff`. Sections cascade.
    pub async fn purge_deleted_before(&self, cutoff: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("purge_trashed_pages");
        let result = sqlx::query("DELETE FROM pages WHERE deleted_at IS NOT NULL AND deleted_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected());
        timer.finish(result)
    }

    // =========================================================================
    // Sections
    // =========================================================================

    /// Live sections of a page in display order.
    pub async fn list_sections(
        &self,
        page_id: Uuid,
        published_only: bool,
    ) -> Result<Vec<PageSectionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_page_sections");
        let result = sqlx::query_as::<_, PageSectionEntity>(&format!(
            r#"
            SELECT {} FROM page_sections
            WHERE page_id = $1 AND deleted_at IS NULL
              AND (NOT $2 OR status = 'published')
            ORDER BY display_order, created_at
            "#,
            SECTION_COLUMNS
        ))
        .bind(page_id)
        .bind(published_only)
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn find_section(&self, id: Uuid) -> Result<Option<PageSectionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_page_section");
        let result = sqlx::query_as::<_, PageSectionEntity>(&format!(
            "SELECT {} FROM page_sections WHERE id = $1 AND deleted_at IS NULL",
            SECTION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn create_section(
        &self,
        page_id: Uuid,
        key: &str,
        display_order: i32,
        content: &Value,
        status: &str,
    ) -> Result<PageSectionEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_page_section");
        let result = sqlx::query_as::<_, PageSectionEntity>(&format!(
            r#"
            INSERT INTO page_sections (page_id, key, display_order, content, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            SECTION_COLUMNS
        ))
        .bind(page_id)
        .bind(key)
        .bind(display_order)
        .bind(content)
        .bind(status)
        .fetch_one(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn update_section(
        &self,
        id: Uuid,
        changes: &SectionChanges<'_>,
    ) -> Result<Option<PageSectionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_page_section");
        let result = sqlx::query_as::<_, PageSectionEntity>(&format!(
            r#"
            UPDATE page_sections
            SET key = COALESCE($2, key),
                display_order = COALESCE($3, display_order),
                content = COALESCE($4, content),
                status = COALESCE($5, status)
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {}
            "#,
            SECTION_COLUMNS
        ))
        .bind(id)
        .bind(changes.key)
        .bind(changes.display_order)
        .bind(changes.content)
        .bind(changes.status)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Rewrite a section's content under a row lock. `edit` sees the current
    /// row and returns the new content; an `Err` from it rolls back and is
    /// handed to the caller. `Ok(None)` when the section does not exist.
    pub async fn edit_section_content<F, E>(
        &self,
        id: Uuid,
        edit: F,
    ) -> Result<Option<PageSectionEntity>, E>
    where
        F: FnOnce(&PageSectionEntity) -> Result<Value, E> + Send,
        E: From<sqlx::Error> + Send,
    {
        let timer = QueryTimer::new("edit_page_section_content");
        let outcome = self.edit_section_content_in_tx(id, edit).await;
        timer.finish(outcome)?
    }

    async fn edit_section_content_in_tx<F, E>(
        &self,
        id: Uuid,
        edit: F,
    ) -> Result<Result<Option<PageSectionEntity>, E>, sqlx::Error>
    where
        F: FnOnce(&PageSectionEntity) -> Result<Value, E> + Send,
        E: Send,
    {
        let mut tx = self.pool.begin().await?;

        let section = sqlx::query_as::<_, PageSectionEntity>(&format!(
            "SELECT {} FROM page_sections WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
            SECTION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(section) = section else {
            return Ok(Ok(None));
        };

        let content = match edit(&section) {
            Ok(content) => content,
            Err(e) => return Ok(Err(e)),
        };

        let updated = sqlx::query_as::<_, PageSectionEntity>(&format!(
            "UPDATE page_sections SET content = $2 WHERE id = $1 RETURNING {}",
            SECTION_COLUMNS
        ))
        .bind(id)
        .bind(&content)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Ok(Some(updated)))
    }

    pub async fn delete_section(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_page_section");
        let result = sqlx::query("DELETE FROM page_sections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected());
        timer.finish(result)
    }
}
