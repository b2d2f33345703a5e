//! Drops expired refresh sessions, stale reset codes and idle rate limiter
//! buckets.

use chrono::{Duration, Utc};
use persistence::repositories::{PasswordResetRepository, UserRepository};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info};

use super::scheduler::{Job, JobFrequency};
use crate::middleware::RateLimiterState;

pub struct SessionCleanupJob {
    pool: PgPool,
    rate_limiter: Option<Arc<RateLimiterState>>,
}

impl SessionCleanupJob {
    pub fn new(pool: PgPool, rate_limiter: Option<Arc<RateLimiterState>>) -> Self {
        Self { pool, rate_limiter }
    }
}

#[async_trait::async_trait]
impl Job for SessionCleanupJob {
    fn name(&self) -> &'static str {
        "session_cleanup"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Hourly
    }

    async fn execute(&self) -> anyhow::Result<()> {
        let now = Utc::now();
        let removed = UserRepository::new(self.pool.clone())
            .delete_expired_sessions(now)
            .await?;
        if removed > 0 {
            info!(removed, "Deleted expired sessions");
        }

        // Codes stay for a day after they stop being usable.
        let stale = PasswordResetRepository::new(self.pool.clone())
            .delete_stale(now - Duration::days(1))
            .await?;
        if stale > 0 {
            info!(stale, "Deleted stale password reset codes");
        }

        if let Some(limiter) = &self.rate_limiter {
            let tracked = limiter.prune();
            debug!(tracked, "Pruned rate limiter state");
        }
        Ok(())
    }
}
