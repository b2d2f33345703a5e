//! Hard-deletes trashed pages older than the retention period.

use chrono::Utc;
use persistence::repositories::PageRepository;
use sqlx::PgPool;
use tracing::info;

use super::scheduler::{Job, JobFrequency};
use crate::services::retention::{purge_cutoff, retention_days};

pub struct PurgeTrashedPagesJob {
    pool: PgPool,
    default_retention_days: i32,
}

impl PurgeTrashedPagesJob {
    pub fn new(pool: PgPool, default_retention_days: i32) -> Self {
        Self {
            pool,
            default_retention_days,
        }
    }
}

#[async_trait::async_trait]
impl Job for PurgeTrashedPagesJob {
    fn name(&self) -> &'static str {
        "purge_trashed_pages"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Daily
    }

    fn run_at_startup(&self) -> bool {
        true
    }

    async fn execute(&self) -> anyhow::Result<()> {
        let days = retention_days(&self.pool, self.default_retention_days).await?;
        let cutoff = purge_cutoff(Utc::now(), days);
        let purged = PageRepository::new(self.pool.clone())
            .purge_deleted_before(cutoff)
            .await?;

        if purged > 0 {
            info!(purged, retention_days = days, "Purged trashed pages");
        }
        Ok(())
    }
}
