use crate::images::ImageLifecycle;
use hearth_core::Config;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

/// Outcome of one cleanup pass. Failed steps are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub temp_images_deleted: Option<usize>,
    /// Orphans found by the dry-run scan; not deleted.
    pub orphans_found: Option<Vec<String>>,
}

/// Periodic garbage collection of abandoned uploads.
#[derive(Clone)]
pub struct ImageCleanupService {
    lifecycle: ImageLifecycle,
    interval: Duration,
    temp_max_age_hours: u32,
    orphan_scan: bool,
}

impl ImageCleanupService {
    pub fn new(
        lifecycle: ImageLifecycle,
        interval: Duration,
        temp_max_age_hours: u32,
        orphan_scan: bool,
    ) -> Self {
        Self {
            lifecycle,
            interval,
            temp_max_age_hours,
            orphan_scan,
        }
    }

    pub fn from_config(lifecycle: ImageLifecycle, config: &Config) -> Self {
        Self::new(
            lifecycle,
            Duration::from_secs(config.cleanup_interval_secs),
            config.temp_max_age_hours,
            config.cleanup_orphan_scan,
        )
    }

    /// Start the background cleanup task.
    /// Returns a JoinHandle for graceful shutdown
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut cleanup_interval = interval(self.interval);
            cleanup_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                cleanup_interval.tick().await;

                tracing::info!("Starting scheduled image cleanup");
                let report = self.run_once().await;
                tracing::info!(
                    temp_images_deleted = ?report.temp_images_deleted,
                    orphans_found = ?report.orphans_found.as_ref().map(Vec::len),
                    "Scheduled image cleanup completed"
                );
            }
        })
    }

    /// Run every enabled cleanup step once. A failing step is logged and does
    /// not stop the others.
    #[tracing::instrument(skip(self), fields(cleanup.operation = "scheduled"))]
    pub async fn run_once(&self) -> CleanupReport {
        let temp_images_deleted = match self
            .lifecycle
            .cleanup_temp_images(Some(self.temp_max_age_hours))
            .await
        {
            Ok(count) => Some(count),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    code = e.error_code(),
                    "Failed to cleanup temporary images"
                );
                None
            }
        };

        let orphans_found = if self.orphan_scan {
            match self.lifecycle.find_orphaned_images(true).await {
                Ok(orphans) => {
                    if !orphans.is_empty() {
                        tracing::warn!(count = orphans.len(), "Orphaned images found");
                    }
                    Some(orphans)
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        code = e.error_code(),
                        "Failed to scan for orphaned images"
                    );
                    None
                }
            }
        } else {
            None
        };

        CleanupReport {
            temp_images_deleted,
            orphans_found,
        }
    }
}
