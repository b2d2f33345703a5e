//! PostgreSQL pool setup and liveness probing.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::{Duration, Instant};

/// Sizing and timeouts for the CMS connection pool.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl PoolSettings {
    /// Settings with the server defaults for the given database URL.
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }
}

/// Open the pool. Connections are checked on acquire so a restarted
/// database does not hand out dead sockets.
pub async fn connect(settings: &PoolSettings) -> Result<PgPool, sqlx::Error> {
    let max = settings.max_connections.max(1);
    let pool = PgPoolOptions::new()
        .max_connections(max)
        .min_connections(settings.min_connections.min(max))
        .acquire_timeout(settings.acquire_timeout)
        .idle_timeout(settings.idle_timeout)
        .test_before_acquire(true)
        .connect(&settings.url)
        .await?;
    tracing::debug!(max_connections = max, "Database pool ready");
    Ok(pool)
}

/// Round-trip a trivial query. Returns the latency in milliseconds, or
/// `None` when the database cannot be reached.
pub async fn ping(pool: &PgPool) -> Option<u64> {
    let start = Instant::now();
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .ok()
        .map(|_| start.elapsed().as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_url_defaults() {
        let settings = PoolSettings::for_url("postgres://localhost/apeck");
        assert_eq!(settings.url, "postgres://localhost/apeck");
        assert_eq!(settings.max_connections, 10);
        assert_eq!(settings.min_connections, 1);
        assert_eq!(settings.idle_timeout, Duration::from_secs(600));
    }
}
