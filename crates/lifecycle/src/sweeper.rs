//! Periodic expiry of stale active alerts.
//!
//! [`ExpirySweeper`] scans the active set on a fixed interval and archives
//! every alert older than the configured maximum age, with the default
//! comment and a fresh contact snapshot. One alert failing to archive is
//! logged and does not stop the rest of the sweep.

use std::sync::Arc;
use std::time::Duration;

use beacon_core::alert::{is_expired, DEFAULT_MAX_AGE_MINS, DEFAULT_SWEEP_INTERVAL_SECS};
use beacon_core::types::Timestamp;
use chrono::Utc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::engine::{AlertLifecycle, ExpireOutcome};
use crate::error::LifecycleError;

#[derive(Debug, Clone, Copy)]
pub struct SweeperConfig {
    /// Time between scans.
    pub interval: Duration,
    /// Alerts strictly older than this are archived.
    pub max_age: chrono::Duration,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            max_age: chrono::Duration::minutes(DEFAULT_MAX_AGE_MINS),
        }
    }
}

/// Counts from one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Active alerts examined.
    pub scanned: usize,
    pub archived: usize,
    /// Expired alerts that were already gone or whose owner is missing.
    pub skipped: usize,
    pub failed: usize,
}

pub struct ExpirySweeper {
    lifecycle: Arc<AlertLifecycle>,
    config: SweeperConfig,
}

impl ExpirySweeper {
    pub fn new(lifecycle: Arc<AlertLifecycle>, config: SweeperConfig) -> Self {
        Self { lifecycle, config }
    }

    /// Run the sweep loop on the runtime until `cancel` fires.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }

    async fn run(self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = self.config.interval.as_secs(),
            max_age_mins = self.config.max_age.num_minutes(),
            "Expiry sweeper started"
        );

        let mut interval = tokio::time::interval(self.config.interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Expiry sweeper stopping");
                    break;
                }
                _ = interval.tick() => {
                    match self.sweep_at(Utc::now()).await {
                        Ok(report) if report.archived > 0 || report.failed > 0 => {
                            tracing::info!(
                                scanned = report.scanned,
                                archived = report.archived,
                                skipped = report.skipped,
                                failed = report.failed,
                                "Expiry sweep finished"
                            );
                        }
                        Ok(report) => {
                            tracing::debug!(scanned = report.scanned, "Expiry sweep: nothing to archive");
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Expiry sweep: listing active alerts failed");
                        }
                    }
                }
            }
        }
    }

    /// Run one sweep as if the current time were `now`.
    ///
    /// Only listing the active set can fail the whole sweep; per-alert
    /// failures are counted in the report.
    pub async fn sweep_at(&self, now: Timestamp) -> Result<SweepReport, LifecycleError> {
        let active = self.lifecycle.active_alerts().await?;
        let mut report = SweepReport {
            scanned: active.len(),
            ..SweepReport::default()
        };

        for alert in active
            .iter()
            .filter(|a| is_expired(a.created_at, now, self.config.max_age))
        {
            match self.lifecycle.expire(alert, now).await {
                Ok(ExpireOutcome::Archived(_)) => report.archived += 1,
                Ok(ExpireOutcome::AlreadyGone) => report.skipped += 1,
                Err(e) => {
                    tracing::warn!(alert_id = alert.id, error = %e, "Expiry sweep: archival failed");
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}
