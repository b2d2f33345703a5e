use anyhow::{Context, Result};
use std::time::Duration;
use tokio::signal;
use tracing::{info, warn};

use apeck_cms_api::app::{create_app, AppState};
use apeck_cms_api::config::Config;
use apeck_cms_api::jobs::{JobScheduler, PoolMetricsJob, PurgeTrashedPagesJob, SessionCleanupJob};
use apeck_cms_api::middleware::{init_metrics, logging::init_logging};

const JOB_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load().context("Failed to load configuration")?;

    init_logging(&config.logging);
    init_metrics().context("Failed to install metrics recorder")?;

    info!("Starting APECK CMS API v{}", env!("CARGO_PKG_VERSION"));

    let pool = persistence::db::connect(&(&config.database).into())
        .await
        .context("Failed to connect to database")?;

    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    info!("Migrations completed");

    tokio::fs::create_dir_all(&config.server.uploads_dir)
        .await
        .with_context(|| format!("Failed to create uploads dir {}", config.server.uploads_dir))?;

    let addr = config.socket_addr().context("Invalid server address")?;
    let default_retention_days = config.content.trash_retention_days;
    let state = AppState::new(config, pool.clone())?;

    let mut scheduler = JobScheduler::new();
    scheduler.register(PurgeTrashedPagesJob::new(pool.clone(), default_retention_days));
    scheduler.register(SessionCleanupJob::new(pool.clone(), state.rate_limiter.clone()));
    scheduler.register(PoolMetricsJob::new(pool));
    scheduler.start();

    let app = create_app(state);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped, waiting for background jobs");
    scheduler.shutdown();
    scheduler.wait_for_shutdown(JOB_SHUTDOWN_TIMEOUT).await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
