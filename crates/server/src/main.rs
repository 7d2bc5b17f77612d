//! Laptop price prediction service
//!
//! Serves the interactive prediction form, the training endpoint, and
//! health/metrics endpoints over one axum router.

use anyhow::Result;
use pricer_lib::schema::TableSchema;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting pricer-server");

    // Load configuration and the table schema
    let config = config::ServerConfig::load()?;
    let schema = match &config.schema_file {
        Some(path) => TableSchema::load(path)?,
        None => TableSchema::default(),
    };
    info!(
        port = config.port,
        artifact_dir = %config.artifact_dir.display(),
        "Server configured"
    );

    // Create shared application state and load persisted artifacts
    let state = Arc::new(api::AppState::new(config, schema));
    match state.load_artifacts() {
        Ok(()) => info!("Loaded persisted model bundle"),
        Err(e) => warn!(error = %e, "No model loaded at startup; train before predicting"),
    }

    // Start the API server
    let port = state.config.port;
    tokio::spawn(api::serve(port, state));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    Ok(())
}
