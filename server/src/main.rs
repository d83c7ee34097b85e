//! Todo list HTTP server.
//!
//! # Usage
//!
//! ```bash
//! TODO_FILE=todo.json PORT=8000 cargo run --bin todolist-server
//! ```
//!
//! The todo file is wiped to an empty list every time the server starts.

mod config;

use anyhow::Context;
use config::{Config, DEFAULT_LOG_FILTER};
use std::future::IntoFuture;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::Notify;
use todolist_core::{TodoEnvironment, environment::SystemClock};
use todolist_runtime::{TodoStore, metrics::install_prometheus_recorder};
use todolist_storage::JsonFileRepository;
use todolist_web::{AppState, build_router};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        todo_file = %config.todo_file.display(),
        templates_dir = %config.templates_dir.display(),
        default_locale = %config.default_locale,
        "Configuration loaded"
    );

    let store = TodoStore::new(
        Arc::new(JsonFileRepository::new(&config.todo_file)),
        TodoEnvironment::new(Arc::new(SystemClock)),
    );
    store
        .reset()
        .with_context(|| format!("failed to reset {}", config.todo_file.display()))?;

    let mut state = AppState::new(store)
        .with_default_locale(config.default_locale)
        .with_templates_dir(&config.templates_dir);
    match install_prometheus_recorder() {
        Ok(handle) => state = state.with_metrics(handle),
        Err(e) => warn!(error = %e, "Metrics disabled"),
    }

    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(address = %addr, "Server listening");

    let stopping = Arc::new(Notify::new());
    let server = axum::serve(listener, app)
        .with_graceful_shutdown({
            let stopping = Arc::clone(&stopping);
            async move {
                shutdown_signal().await;
                stopping.notify_one();
            }
        })
        .into_future();
    let deadline = async {
        stopping.notified().await;
        tokio::time::sleep(config.shutdown_timeout()).await;
    };

    tokio::select! {
        result = server => result.context("server error")?,
        () = deadline => {
            warn!(
                timeout_secs = config.shutdown_timeout,
                "In-flight requests did not finish before the shutdown timeout"
            );
        }
    }

    info!("Server stopped");
    Ok(())
}

/// Graceful shutdown signal handler.
///
/// Waits for:
/// - Ctrl+C (SIGINT)
/// - SIGTERM (on Unix)
///
/// If a handler cannot be installed, that signal is never reported.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
