//! Method network dashboard - entry point for the web server.
//!
//! The application is organized into the following modules:
//!
//! - `dataset`: paper table and overlay loading
//! - `normalize`, `incidence`, `cooccurrence`: the co-occurrence pipeline
//! - `catalog`, `search`, `trends`: per-method metadata and derived views
//! - `selection`, `network`, `papers`: interaction state, drawn network, paper lookup
//! - `session`: per-browser state keyed by cookie
//! - `templates`, `handlers`: HTML/JS and HTTP route handlers

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use methodnet::{config::Cli, handlers, AppState};

const DEFAULT_LOG_FILTER: &str = "methodnet=info,tower_http=info";

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .init();

    let config = Cli::parse().into_config().context("invalid configuration")?;
    let addr = config.bind_addr();
    let data_path = config.data_path.clone();

    let state = AppState::load(config)
        .with_context(|| format!("failed to load dataset from {}", data_path.display()))?;
    let app = handlers::router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    tracing::info!("method network dashboard running at http://{}", addr);
    tracing::info!("dataset: {}", data_path.display());

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
