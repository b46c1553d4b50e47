//! Application builder: wires stores, services and the router, then serves.

use std::sync::Arc;

use axum::Router;
use tracing::{error, info, warn};

use docshare_core::config::{AppConfig, StoreProvider};
use docshare_core::error::{AppError, ErrorKind};
use docshare_database::{DatabasePool, Stores, migration};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the DocShare server until a shutdown signal arrives.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    info!(version = env!("CARGO_PKG_VERSION"), "Starting DocShare server");
    config.validate()?;

    // ── Step 1: Stores ───────────────────────────────────────────
    let (stores, pool) = match config.database.provider {
        StoreProvider::Postgres => {
            let pool = DatabasePool::connect(&config.database).await?;
            if config.database.run_migrations {
                migration::run_migrations(pool.pool()).await?;
            }
            (Stores::postgres(pool.pool().clone()), Some(pool))
        }
        StoreProvider::Memory => {
            warn!("Using in-memory stores; data is lost on restart");
            (Stores::memory(), None)
        }
    };

    // ── Step 2: Services ─────────────────────────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, stores)?;
    let notifier = Arc::clone(&state.notifier);
    let app = build_app(state);

    // ── Step 3: Serve ────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e)
    })?;
    info!(addr = %addr, "DocShare server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Server error", e))?;

    info!("Waiting for in-flight notifications");
    notifier.drain().await;

    if let Some(pool) = pool {
        pool.close().await;
    }
    info!("DocShare server stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
