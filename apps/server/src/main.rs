//! # Kardex API Server
//!
//! HTTP server for the Kardex inventory dashboard.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kardex API Server                                │
//! │                                                                         │
//! │  Frontend ───► REST (5001) ───► QueryClient ───► InventoryStore         │
//! │                                     │                                   │
//! │                                     ▼                                   │
//! │                                QueryCache                               │
//! │                          (invalidated per write)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod routes;
mod state;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::KardexConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing; RUST_LOG overrides the default level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Kardex API server...");

    // Load configuration
    let config = KardexConfig::load_or_default(None);
    info!(
        bind = %config.bind_address(),
        seed_demo = config.inventory.seed_demo,
        recent_limit = config.inventory.recent_limit,
        "Configuration loaded"
    );

    // Create shared state
    let state = AppState::new(&config);
    if config.inventory.seed_demo {
        state.seed_demo().await;
    }

    // Build the router and bind
    let app = routes::router(state);
    let listener = TcpListener::bind(config.bind_address()).await?;
    info!(addr = %listener.local_addr()?, "Listening");

    // Serve until shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves when the process receives Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
