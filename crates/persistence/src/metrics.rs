//! Repository query timings and pool occupancy gauges.

use metrics::{counter, gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Point-in-time view of the connection pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSnapshot {
    pub total: u32,
    pub idle: u32,
}

impl PoolSnapshot {
    pub fn of(pool: &PgPool) -> Self {
        Self {
            total: pool.size(),
            idle: pool.num_idle() as u32,
        }
    }

    pub fn in_use(&self) -> u32 {
        self.total.saturating_sub(self.idle)
    }
}

/// Publish pool gauges and return the snapshot they were taken from.
pub fn record_pool_metrics(pool: &PgPool) -> PoolSnapshot {
    let snapshot = PoolSnapshot::of(pool);
    gauge!("cms_db_connections_in_use").set(snapshot.in_use() as f64);
    gauge!("cms_db_connections_idle").set(snapshot.idle as f64);
    gauge!("cms_db_connections_total").set(snapshot.total as f64);
    snapshot
}

/// Times one repository call, labelled with the operation name.
///
/// ```ignore
/// let timer = QueryTimer::new("find_page_by_id");
/// let page = sqlx::query_as::<_, PageEntity>(...).fetch_optional(&self.pool).await;
/// timer.finish(page)
/// ```
pub struct QueryTimer {
    operation: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }

    pub fn record(self) {
        histogram!("cms_db_query_duration_seconds", "operation" => self.operation)
            .record(self.start.elapsed().as_secs_f64());
    }

    /// Record the duration and count the call as failed when `result` is an error.
    pub fn finish<T, E>(self, result: Result<T, E>) -> Result<T, E> {
        if result.is_err() {
            counter!("cms_db_query_errors_total", "operation" => self.operation).increment(1);
        }
        self.record();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_keeps_operation_name() {
        let timer = QueryTimer::new("list_pages");
        assert_eq!(timer.operation, "list_pages");
    }

    #[test]
    fn test_finish_passes_result_through() {
        let ok: Result<u8, &str> = QueryTimer::new("count_pages").finish(Ok(3));
        assert_eq!(ok, Ok(3));
        let err: Result<u8, &str> = QueryTimer::new("count_pages").finish(Err("boom"));
        assert_eq!(err, Err("boom"));
    }

    #[test]
    fn test_snapshot_in_use() {
        let snapshot = PoolSnapshot { total: 8, idle: 3 };
        assert_eq!(snapshot.in_use(), 5);
        let drained = PoolSnapshot { total: 2, idle: 5 };
        assert_eq!(drained.in_use(), 0);
    }
}
