//! Site route repository.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::SiteRouteEntity;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct SiteRouteRepository {
    pool: PgPool,
}

impl SiteRouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All routes, newest first.
    pub async fn list(&self) -> Result<Vec<SiteRouteEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_routes");
        let result = sqlx::query_as::<_, SiteRouteEntity>(
            r#"
            SELECT id, slug, target, is_active, created_at, updated_at
            FROM routes
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Routes shown on the public site.
    pub async fn list_active(&self) -> Result<Vec<SiteRouteEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_active_routes");
        let result = sqlx::query_as::<_, SiteRouteEntity>(
            r#"
            SELECT id, slug, target, is_active, created_at, updated_at
            FROM routes
            WHERE is_active = true
            ORDER BY slug
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn create(
        &self,
        slug: &str,
        target: &str,
        is_active: bool,
    ) -> Result<SiteRouteEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_route");
        let result = sqlx::query_as::<_, SiteRouteEntity>(
            r#"
            INSERT INTO routes (slug, target, is_active)
            VALUES ($1, $2, $3)
            RETURNING id, slug, target, is_active, created_at, updated_at
            "#,
        )
        .bind(slug)
        .bind(target)
        .bind(is_active)
        .fetch_one(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn update(
        &self,
        id: Uuid,
        slug: Option<&str>,
        target: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<Option<SiteRouteEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_route");
        let result = sqlx::query_as::<_, SiteRouteEntity>(
            r#"
            UPDATE routes
            SET slug = COALESCE($2, slug),
                target = COALESCE($3, target),
                is_active = COALESCE($4, is_active)
            WHERE id = $1
            RETURNING id, slug, target, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(slug)
        .bind(target)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_route");
        let result = sqlx::query("DELETE FROM routes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected());
        timer.finish(result)
    }
}
