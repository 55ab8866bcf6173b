use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::drafts::DraftStore;

/// Background task that sweeps expired drafts out of the draft store
pub struct DraftCleanupTask {
    drafts: Arc<dyn DraftStore>,
    interval: Duration,
    shutdown: broadcast::Receiver<()>,
}

impl DraftCleanupTask {
    pub fn new(
        drafts: Arc<dyn DraftStore>,
        interval: Duration,
        shutdown: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            drafts,
            interval,
            shutdown,
        }
    }

    /// Run sweeps until the shutdown signal fires
    pub async fn run(mut self) {
        let mut cleanup_timer = tokio::time::interval(self.interval);

        // Skip immediate first tick
        cleanup_timer.tick().await;

        tracing::info!(
            backend = self.drafts.backend_name(),
            cleanup_interval_ms = self.interval.as_millis() as u64,
            "Draft cleanup task started"
        );

        loop {
            tokio::select! {
                _ = self.shutdown.recv() => {
                    tracing::info!("Draft cleanup task received shutdown signal");
                    break;
                }
                _ = cleanup_timer.tick() => {
                    self.sweep().await;
                }
            }
        }

        tracing::info!("Draft cleanup task stopped");
    }

    async fn sweep(&self) {
        match self.drafts.cleanup_expired().await {
            Ok(0) => {}
            Ok(removed) => tracing::info!(removed, "Draft cleanup completed"),
            Err(e) => tracing::warn!(error = %e, "Draft cleanup failed"),
        }
    }
}
