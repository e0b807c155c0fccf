//! Storage setup and initialization

use anyhow::Result;
use clipdock_core::Config;
use clipdock_storage::{create_storage, Storage};
use std::sync::Arc;

/// Setup the storage backend named in configuration
pub fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage backend...");
    let storage = create_storage(config)?;
    tracing::info!(
        backend = %storage.backend_type(),
        "Storage backend initialized"
    );
    Ok(storage)
}
