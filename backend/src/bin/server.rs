//! DestinyPath HTTP Server Binary
//!
//! Loads configuration, builds the shared state, and serves the REST API.
//!
//! # Usage
//!
//! ```bash
//! # Defaults: analytic ephemeris, storage service on localhost:3000
//! cargo run --bin destinypath-server
//!
//! # In-memory persistence, explicit config file
//! SUBMISSION_KIND=local DESTINYPATH_CONFIG=./destinypath.toml \
//!   cargo run --bin destinypath-server
//! ```
//!
//! # Environment Variables
//!
//! - `DESTINYPATH_CONFIG`: Config file path (default: search for destinypath.toml)
//! - `HOST`, `PORT`: Listener (default: 0.0.0.0:8080)
//! - `SUBMISSION_KIND`, `SUBMISSION_BASE_URL`: Persistence target
//! - `EPHEMERIS_SOURCE`, `EPHEMERIS_DATA_PATH`: Ephemeris provider
//! - `CHAT_ENDPOINT`: Text-generation endpoint (chat disabled when unset)
//! - `LOCAL_TIME_POLICY`: `reject` or `earliest`
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use destinypath::config::AppConfig;
use destinypath::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Also installs the `log` bridge, so library records show up here.
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting DestinyPath HTTP Server");

    let config = AppConfig::load().context("Failed to load configuration")?;
    let state = AppState::from_config(&config)?;
    info!(
        sink = state.sink.name(),
        ephemeris = state.calculator.ephemeris_name(),
        policy = ?state.calculator.policy(),
        chat = state.responder.is_some(),
        "Components initialized"
    );

    let app = create_router(state);

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.bind_address()))?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
