//! # Tally POS Server
//!
//! HTTP API server for the Tally POS backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Tally POS Server                         │
//! │                                                                 │
//! │  Client ───► HTTP/JSON (3000) ───► Routes ───► tally-db ───►   │
//! │                   │                                 SQLite      │
//! │                   ▼                                             │
//! │            Bearer-token middleware                              │
//! │            (verifies {sub, role}, attaches AuthUser)            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod auth;
mod config;
mod error;
mod routes;

use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use tally_db::{Database, DbConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Tally POS server...");

    let config = ServerConfig::load()?;
    info!(
        port = config.http_port,
        db_path = %config.database_path,
        "Configuration loaded"
    );

    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    info!("Database ready");

    let state = AppState {
        db,
        config: config.clone(),
    };
    let app = routes::build_router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    info!(%addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
