//! Sweep Scheduler - runs the corrective sweep on a fixed interval
//!
//! The periodic trigger surface. The loop awaits each sweep before the next
//! tick is taken, so the scheduler cannot overlap its own invocations; any
//! further overlap guarding is a host concern.

use crate::application::shutdown::ShutdownToken;
use crate::application::ReconcileEngine;
use crate::domain::{RunConfig, SweepSummary};
use crate::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info};

/// Periodic sweep scheduler
pub struct SweepScheduler {
    engine: Arc<ReconcileEngine>,
    config: RunConfig,
    interval_minutes: u64,
}

impl SweepScheduler {
    /// # Arguments
    /// * `engine` - Reconciliation engine
    /// * `config` - Run configuration applied to every scheduled sweep
    /// * `interval_minutes` - How often to sweep (minutes)
    pub fn new(engine: Arc<ReconcileEngine>, config: RunConfig, interval_minutes: u64) -> Self {
        Self {
            engine,
            config,
            interval_minutes,
        }
    }

    /// Run the sweep loop (background task)
    ///
    /// Runs one sweep per interval until shutdown is signalled.
    /// Should be spawned in tokio::spawn.
    pub async fn run(self, mut shutdown: ShutdownToken) {
        info!(
            interval_minutes = self.interval_minutes,
            lookback_days = self.config.lookback_days(),
            max_orders = self.config.max_orders(),
            "Sweep scheduler started"
        );

        let mut tick = interval(Duration::from_secs(self.interval_minutes * 60));

        loop {
            tokio::select! {
                _ = tick.tick() => {}
                _ = shutdown.wait() => {
                    info!("Sweep scheduler shutting down");
                    break;
                }
            }

            match self.engine.run_sweep(&self.config).await {
                Ok(summary) => {
                    info!(
                        checked = summary.checked,
                        reconciled = summary.reconciled,
                        "Scheduled sweep completed"
                    );
                }
                Err(e) => {
                    error!(error = ?e, "Scheduled sweep failed");
                }
            }
        }
    }

    /// Run a sweep immediately (manual "run now" trigger)
    pub async fn run_now(&self) -> Result<SweepSummary> {
        info!("Running manual sweep...");
        self.engine.run_sweep(&self.config).await
    }
}
