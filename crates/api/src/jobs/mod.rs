//! Background jobs and their scheduler.

mod pool_metrics;
mod purge_trash;
mod scheduler;
mod session_cleanup;

pub use pool_metrics::PoolMetricsJob;
pub use purge_trash::PurgeTrashedPagesJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};
pub use session_cleanup::SessionCleanupJob;
