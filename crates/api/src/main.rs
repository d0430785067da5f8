use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tokio::signal;
use tracing::{info, warn};

use helper_admin_api::app::{create_app, AppState};
use helper_admin_api::config::Config;
use helper_admin_api::jobs::{
    upload::DEFAULT_QUEUE_CAPACITY, JobScheduler, LoginThrottleCleanupJob, PoolMetricsJob,
    UploadQueue, UploadTmpSweepJob, UploadWorker, UPLOAD_TMP_MAX_AGE,
};
use helper_admin_api::middleware::{init_metrics, logging::init_logging};
use helper_admin_api::services::bootstrap_admin;
use helper_admin_api::storage;
use persistence::repositories::{AdminUserRepository, VersionRepository};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    // Keep the guard alive so buffered file logs are flushed on exit.
    let _log_guard = init_logging(&config.logging);

    info!(env = %config.server.env, "Starting helper admin v{}", env!("CARGO_PKG_VERSION"));

    init_metrics()?;

    let pool = persistence::db::connect(&config.database.pool_settings()).await?;

    info!("Running database migrations...");
    persistence::db::migrate(&pool).await?;
    info!("Migrations completed");

    let object_storage = storage::from_config(&config.storage)?;
    let (uploads, upload_rx) = UploadQueue::new(DEFAULT_QUEUE_CAPACITY);
    let upload_worker = UploadWorker::new(
        upload_rx,
        object_storage,
        VersionRepository::new(pool.clone()),
    )
    .spawn();

    let addr = config.socket_addr()?;
    let state = AppState::new(config, pool.clone(), uploads)?;

    let mut scheduler = JobScheduler::new();
    scheduler.register(PoolMetricsJob::new(
        pool.clone(),
        state.config.database.max_connections,
    ));
    scheduler.register(UploadTmpSweepJob::new(
        PathBuf::from(&state.config.storage.upload_tmp_path),
        UPLOAD_TMP_MAX_AGE,
    ));
    scheduler.register(LoginThrottleCleanupJob::new(state.login_throttle.clone()));
    scheduler.start();

    match bootstrap_admin(
        &AdminUserRepository::new(pool.clone()),
        &state.ids,
        &state.config.admin,
    )
    .await
    {
        Ok(Some(id)) => info!(admin_id = id, "bootstrap super admin created"),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "admin bootstrap failed"),
    }

    let app = create_app(state);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped, draining background work");
    scheduler.shutdown();
    scheduler.wait_for_shutdown(SHUTDOWN_GRACE).await;

    // The router held the last queue handle; the worker exits once the queue is empty.
    if tokio::time::timeout(SHUTDOWN_GRACE, upload_worker)
        .await
        .is_err()
    {
        warn!("upload worker did not finish in time, pending uploads dropped");
    }

    pool.close().await;
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
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
