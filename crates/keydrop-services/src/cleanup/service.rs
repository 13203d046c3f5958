use crate::lifecycle::FileLifecycleService;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

/// Periodic scheduler for the expire sweep.
///
/// The lifecycle service itself owns no timers; this loop is the external
/// scheduler that invokes its sweep on a fixed interval. The sweep is
/// idempotent, so overlapping deployments running their own loops are safe.
#[derive(Clone)]
pub struct CleanupService {
    lifecycle: Arc<FileLifecycleService>,
    interval_secs: u64,
}

impl CleanupService {
    pub fn new(lifecycle: Arc<FileLifecycleService>, interval_secs: u64) -> Self {
        Self {
            lifecycle,
            interval_secs,
        }
    }

    /// Start the background cleanup task.
    /// Returns a JoinHandle for graceful shutdown.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut cleanup_interval = interval(Duration::from_secs(self.interval_secs));

            loop {
                cleanup_interval.tick().await;

                tracing::info!("Starting scheduled cleanup of expired files");

                match self.lifecycle.expire_sweep().await {
                    Ok(removed) => {
                        tracing::info!(removed, "Cleanup task completed");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Cleanup task failed");
                    }
                }
            }
        })
    }
}
