//! Blob storage setup

use anyhow::{Context, Result};
use keydrop_core::Config;
use keydrop_storage::{create_storage, BlobStorage};
use std::sync::Arc;

/// Create the configured blob storage backend and make sure its container
/// exists before the server starts taking traffic.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn BlobStorage>> {
    let storage = create_storage(config)
        .await
        .context("Failed to initialize blob storage")?;

    storage
        .ensure_container()
        .await
        .context("Failed to ensure storage container exists")?;

    tracing::info!(
        backend = ?storage.backend_type(),
        "Blob storage initialized"
    );

    Ok(storage)
}
