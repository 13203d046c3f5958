//! Service initialization

use crate::state::AppState;
use anyhow::Result;
use keydrop_core::{Config, SystemClock};
use keydrop_db::PgFileStore;
use keydrop_services::{CleanupService, FileLifecycleService};
use keydrop_storage::BlobStorage;
use sqlx::PgPool;
use std::sync::Arc;

/// Wire up the lifecycle service and background cleanup, and build the
/// shared application state.
pub fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn BlobStorage>,
) -> Result<Arc<AppState>> {
    let store = Arc::new(PgFileStore::new(pool.clone()));
    let clock = Arc::new(SystemClock);

    let lifecycle = Arc::new(
        FileLifecycleService::new(store, storage, clock).with_limits(
            config.max_file_size_bytes(),
            config.file_ttl(),
            config.download_url_ttl(),
        ),
    );

    let cleanup_interval = config.cleanup_interval_secs();
    if cleanup_interval > 0 {
        let cleanup = CleanupService::new(lifecycle.clone(), cleanup_interval);
        cleanup.start();
        tracing::info!(
            interval_secs = cleanup_interval,
            "Background cleanup scheduled"
        );
    } else {
        tracing::warn!("Background cleanup disabled (CLEANUP_INTERVAL_SECS=0)");
    }

    Ok(Arc::new(AppState {
        config: config.clone(),
        pool,
        lifecycle,
    }))
}
