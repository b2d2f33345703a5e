//! Site route entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::SiteRoute;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct SiteRouteEntity {
    pub id: Uuid,
    pub slug: String,
    pub target: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SiteRouteEntity> for SiteRoute {
    fn from(entity: SiteRouteEntity) -> Self {
        Self {
            id: entity.id,
            slug: entity.slug,
            target: entity.target,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
