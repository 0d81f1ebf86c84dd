//! Task worker pool HTTP server.
//!
//! Reads configuration from the environment (see `AppConfig::from_env`),
//! starts the worker pool, serves the task API, and on SIGINT/SIGTERM stops
//! accepting connections and drains the pool within `SHUTDOWN_TIMEOUT`.

use anyhow::Context;
use tracing::{error, info, warn};

use task_worker_pool::builders::build_app;
use task_worker_pool::config::AppConfig;
use task_worker_pool::core::AppResult;
use task_worker_pool::runtime::{router, AppState};
use task_worker_pool::util::init_tracing;

#[tokio::main]
async fn main() -> AppResult<()> {
    init_tracing();

    let cfg = AppConfig::from_env();
    info!(
        addr = %cfg.bind_addr(),
        workers = cfg.pool.workers,
        queue_capacity = cfg.pool.queue_capacity,
        shutdown_timeout_secs = cfg.pool.shutdown_timeout_secs,
        "task-worker-pool starting..."
    );

    let app = build_app(&cfg)?;
    let routes = router(AppState::new(app.service.clone(), app.pool.clone()));

    let addr = cfg.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Listening");

    axum::serve(listener, routes)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server failed")?;

    info!("Server stopped accepting connections, draining worker pool");

    let pool = app.pool.clone();
    let timeout = cfg.shutdown_timeout();
    let drained = tokio::task::spawn_blocking(move || pool.shutdown(timeout))
        .await
        .context("worker pool shutdown panicked")?;

    match drained {
        Ok(()) => info!("Shut down gracefully"),
        Err(e) => warn!(error = %e, stats = ?app.pool.stats(), "Worker pool did not drain in time"),
    }

    Ok(())
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shut down signal received");
}
