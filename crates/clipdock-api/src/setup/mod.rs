//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;
pub mod telemetry;

use crate::state::AppState;
use anyhow::{Context, Result};
use clipdock_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    // Initialize telemetry first
    telemetry::init_tracing();

    tracing::info!("Configuration loaded and validated successfully");

    // Setup database
    let pool = database::setup_database(&config).await?;

    // Setup storage
    let storage = storage::setup_storage(&config)?;

    // Initialize repositories and the ingest pipeline
    let state = AppState::initialize(&config, pool, storage);

    // Setup routes
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
