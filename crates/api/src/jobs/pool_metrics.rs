//! Publishes connection pool gauges for `/metrics`.

use sqlx::PgPool;

use super::scheduler::{Job, JobFrequency};

pub struct PoolMetricsJob {
    pool: PgPool,
}

impl PoolMetricsJob {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Job for PoolMetricsJob {
    fn name(&self) -> &'static str {
        "pool_metrics"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(15)
    }

    fn run_at_startup(&self) -> bool {
        true
    }

    async fn execute(&self) -> anyhow::Result<()> {
        let snapshot = persistence::metrics::record_pool_metrics(&self.pool);
        if snapshot.total > 0 && snapshot.idle == 0 {
            tracing::debug!(in_use = snapshot.in_use(), "Connection pool fully checked out");
        }
        Ok(())
    }
}
