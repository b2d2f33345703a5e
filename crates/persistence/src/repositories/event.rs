//! Event repository. Reads join the cover media asset for its URL.

use chrono::NaiveDate;
use domain::services::slug::candidate_slug;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::EventEntity;
use crate::metrics::QueryTimer;

const EVENT_SELECT: &str = r#"
    SELECT e.id, e.slug, e.title, e.description, e.start_date, e.end_date, e.location,
           e.category, e.status, e.cover_media_id, m.url AS cover_image_url,
           e.created_at, e.updated_at
    FROM events e
    LEFT JOIN media_assets m ON m.id = e.cover_media_id
"#;

#[derive(Debug, Clone)]
pub struct NewEvent<'a> {
    pub slug: &'a str,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub status: &'a str,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub location: Option<&'a str>,
    pub category: Option<&'a str>,
    pub cover_media_id: Option<Uuid>,
}

#[derive(Debug, Default, Clone)]
pub struct EventChanges<'a> {
    pub slug: Option<&'a str>,
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub status: Option<&'a str>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub location: Option<&'a str>,
    pub category: Option<&'a str>,
    pub cover_media_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_events");
        let result = sqlx::query_as::<_, EventEntity>(&format!(
            "{} ORDER BY e.created_at DESC",
            EVENT_SELECT
        ))
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Published events, soonest first.
    pub async fn list_published(&self) -> Result<Vec<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_published_events");
        let result = sqlx::query_as::<_, EventEntity>(&format!(
            "{} WHERE e.status = 'published' ORDER BY e.start_date ASC",
            EVENT_SELECT
        ))
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_by_id");
        let result = sqlx::query_as::<_, EventEntity>(&format!("{} WHERE e.id = $1", EVENT_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.finish(result)
    }

    async fn slug_exists(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("event_slug_exists");
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM events WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2))",
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

    /// Insert an event and return it with its cover URL.
    pub async fn create(&self, event: &NewEvent<'_>) -> Result<EventEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_event");
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO events (slug, title, description, status, start_date, end_date, location,
                                category, cover_media_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(event.slug)
        .bind(event.title)
        .bind(event.description)
        .bind(event.status)
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(event.location)
        .bind(event.category)
        .bind(event.cover_media_id)
        .fetch_one(&self.pool)
        .await;
        let id = timer.finish(id)?;

        self.find_by_id(id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn update(
        &self,
        id: Uuid,
        changes: &EventChanges<'_>,
    ) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_event");
        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE events
            SET slug = COALESCE($2, slug),
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                status = COALESCE($5, status),
                start_date = COALESCE($6, start_date),
                end_date = COALESCE($7, end_date),
                location = COALESCE($8, location),
                category = COALESCE($9, category),
                cover_media_id = COALESCE($10, cover_media_id)
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(changes.slug)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.status)
        .bind(changes.start_date)
        .bind(changes.end_date)
        .bind(changes.location)
        .bind(changes.category)
        .bind(changes.cover_media_id)
        .fetch_optional(&self.pool)
        .await;
        let updated = timer.finish(updated)?;

        match updated {
            Some(id) => self.find_by_id(id).await,
            None => Ok(None),
        }
    }

    pub async fn publish(&self, id: Uuid) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("publish_event");
        let updated = sqlx::query_scalar::<_, Uuid>(
            "UPDATE events SET status = 'published' WHERE id = $1 RETURNING id",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        let updated = timer.finish(updated)?;

        match updated {
            Some(id) => self.find_by_id(id).await,
            None => Ok(None),
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_event");
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected());
        timer.finish(result)
    }
}
