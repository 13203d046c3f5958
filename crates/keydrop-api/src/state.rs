//! Shared application state.

use keydrop_core::Config;
use keydrop_services::FileLifecycleService;
use sqlx::PgPool;
use std::sync::Arc;

/// State shared across all handlers. Built once during setup and passed to
/// the router as `Arc<AppState>`.
pub struct AppState {
    pub config: Config,
    pub pool: PgPool,
    pub lifecycle: Arc<FileLifecycleService>,
}
