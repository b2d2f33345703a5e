//! News post repository.

use chrono::{DateTime, Utc};
use domain::services::slug::candidate_slug;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{NewsPostEntity, NewsSummaryEntity};
use crate::metrics::QueryTimer;

const NEWS_COLUMNS: &str = "id, slug, title, excerpt, body, status, published_at, hero_media_id, \
                            hero_image_url, author_id, show_on_home, home_display_order, \
                            reading_time, created_at, updated_at";

const SUMMARY_COLUMNS: &str = "id, slug, title, excerpt, hero_image_url, hero_media_id, \
                               reading_time, published_at, show_on_home, home_display_order";

/// Columns for a new post, with slug and publish date already resolved.
#[derive(Debug, Clone)]
pub struct NewNewsPost<'a> {
    pub slug: &'a str,
    pub title: &'a str,
    pub excerpt: Option<&'a str>,
    pub body: &'a str,
    pub status: &'a str,
    pub published_at: Option<DateTime<Utc>>,
    pub show_on_home: bool,
    pub home_display_order: i32,
    pub hero_image_url: Option<&'a str>,
    pub hero_media_id: Option<Uuid>,
    pub author_id: Option<Uuid>,
    pub reading_time: Option<&'a str>,
}

/// Partial post update.
///
/// `published_at` is `Some(value)` to overwrite the column (including
/// with NULL) and `None` to keep it.
#[derive(Debug, Default, Clone)]
pub struct NewsChanges<'a> {
    pub slug: Option<&'a str>,
    pub title: Option<&'a str>,
    pub excerpt: Option<&'a str>,
    pub body: Option<&'a str>,
    pub status: Option<&'a str>,
    pub published_at: Option<Option<DateTime<Utc>>>,
    pub show_on_home: Option<bool>,
    pub home_display_order: Option<i32>,
    pub hero_image_url: Option<&'a str>,
    pub hero_media_id: Option<Uuid>,
    pub author_id: Option<Uuid>,
    pub reading_time: Option<&'a str>,
}

/// Admin listing filters.
#[derive(Debug, Default, Clone)]
pub struct NewsFilter<'a> {
    pub status: Option<&'a str>,
    pub show_on_home: Option<bool>,
    /// Lowercased `LIKE` pattern.
    pub search: Option<&'a str>,
}

#[derive(Clone)]
pub struct NewsRepository {
    pool: PgPool,
}

impl NewsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &NewsFilter<'_>) -> Result<Vec<NewsPostEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_news_posts");
        let result = sqlx::query_as::<_, NewsPostEntity>(&format!(
            r#"
            SELECT {} FROM news_posts
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::boolean IS NULL OR show_on_home = $2)
              AND ($3::text IS NULL
                   OR LOWER(title) LIKE $3 ESCAPE '\'
                   OR LOWER(COALESCE(excerpt, '')) LIKE $3 ESCAPE '\')
            ORDER BY created_at DESC
            "#,
            NEWS_COLUMNS
        ))
        .bind(filter.status)
        .bind(filter.show_on_home)
        .bind(filter.search)
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<NewsPostEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_news_post_by_id");
        let result = sqlx::query_as::<_, NewsPostEntity>(&format!(
            "SELECT {} FROM news_posts WHERE id = $1",
            NEWS_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    async fn slug_exists(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("news_slug_exists");
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM news_posts WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await;
        timer.finish(result)
    }

    /// First free slug among `base`, `base-1`, `base-2`, ...
    pub async fn unique_slug(&self, base: &str, exclude_id: Option<Uuid>) -> Result<String, sqlx::Error> {
        let mut attempt = 0;
        loop {
            let candidate = candidate_slug(base, attempt);
            if !self.slug_exists(&candidate, exclude_id).await? {
                return Ok(candidate);
            }
            attempt += 1;
        }
    }

    pub async fn create(&self, post: &NewNewsPost<'_>) -> Result<NewsPostEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_news_post");
        let result = sqlx::query_as::<_, NewsPostEntity>(&format!(
            r#"
            INSERT INTO news_posts (slug, title, excerpt, body, status, published_at, show_on_home,
                                    home_display_order, hero_image_url, hero_media_id, author_id,
                                    reading_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            NEWS_COLUMNS
        ))
        .bind(post.slug)
        .bind(post.title)
        .bind(post.excerpt)
        .bind(post.body)
        .bind(post.status)
        .bind(post.published_at)
        .bind(post.show_on_home)
        .bind(post.home_display_order)
        .bind(post.hero_image_url)
        .bind(post.hero_media_id)
        .bind(post.author_id)
        .bind(post.reading_time)
        .fetch_one(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn update(
        &self,
        id: Uuid,
        changes: &NewsChanges<'_>,
    ) -> Result<Option<NewsPostEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_news_post");
        let result = sqlx::query_as::<_, NewsPostEntity>(&format!(
            r#"
            UPDATE news_posts
            SET slug = COALESCE($2, slug),
                title = COALESCE($3, title),
                excerpt = COALESCE($4, excerpt),
                body = COALESCE($5, body),
                status = COALESCE($6, status),
                published_at = CASE WHEN $7 THEN $8 ELSE published_at END,
                show_on_home = COALESCE($9, show_on_home),
                home_display_order = COALESCE($10, home_display_order),
                hero_image_url = COALESCE($11, hero_image_url),
                hero_media_id = COALESCE($12, hero_media_id),
                author_id = COALESCE($13, author_id),
                reading_time = COALESCE($14, reading_time)
            WHERE id = $1
            RETURNING {}
            "#,
            NEWS_COLUMNS
        ))
        .bind(id)
        .bind(changes.slug)
        .bind(changes.title)
        .bind(changes.excerpt)
        .bind(changes.body)
        .bind(changes.status)
        .bind(changes.published_at.is_some())
        .bind(changes.published_at.flatten())
        .bind(changes.show_on_home)
        .bind(changes.home_display_order)
        .bind(changes.hero_image_url)
        .bind(changes.hero_media_id)
        .bind(changes.author_id)
        .bind(changes.reading_time)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn publish(&self, id: Uuid, now: DateTime<Utc>) -> Result<Option<NewsPostEntity>, sqlx::Error> {
        let timer = QueryTimer::new("publish_news_post");
        let result = sqlx::query_as::<_, NewsPostEntity>(&format!(
            r#"
            UPDATE news_posts SET status = 'published', published_at = $2
            WHERE id = $1
            RETURNING {}
            "#,
            NEWS_COLUMNS
        ))
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_news_post");
        let result = sqlx::query("DELETE FROM news_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected());
        timer.finish(result)
    }

    /// Published posts visible at `now`.
    ///
    /// Featured listings follow the homepage order, others newest first.
    pub async fn list_public(
        &self,
        featured_only: bool,
        limit: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<Vec<NewsSummaryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_public_news");
        let order = if featured_only {
            "home_display_order ASC, published_at DESC NULLS LAST"
        } else {
            "published_at DESC NULLS LAST, created_at DESC"
        };
        let result = sqlx::query_as::<_, NewsSummaryEntity>(&format!(
            r#"
            SELECT {} FROM news_posts
            WHERE status = 'published'
              AND (published_at IS NULL OR published_at <= $1)
              AND (NOT $2 OR show_on_home = true)
            ORDER BY {}
            LIMIT $3
            "#,
            SUMMARY_COLUMNS, order
        ))
        .bind(now)
        .bind(featured_only)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn find_public_by_slug(
        &self,
        slug: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<NewsPostEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_public_news_by_slug");
        let result = sqlx::query_as::<_, NewsPostEntity>(&format!(
            r#"
            SELECT {} FROM news_posts
            WHERE slug = $1 AND status = 'published'
              AND (published_at IS NULL OR published_at <= $2)
            "#,
            NEWS_COLUMNS
        ))
        .bind(slug)
        .bind(now)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }
}
