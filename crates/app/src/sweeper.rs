//! Expiry sweeper.
//!
//! A time-driven task that returns stock from holds that lapsed before
//! they were converted. Each release re-checks the hold's
//! status under lock, so the sweeper tolerates concurrent request-path
//! activity between scan and release.

use std::{sync::Arc, time::Duration};

use jiff::Timestamp;
use tracing::{error, info};

use crate::domain::holds::{HoldsService, HoldsServiceError};

pub struct Sweeper {
    holds: Arc<dyn HoldsService>,
    period: Duration,
}

impl Sweeper {
    #[must_use]
    pub fn new(holds: Arc<dyn HoldsService>, period: Duration) -> Self {
        Self { holds, period }
    }

    /// Tick forever, sweeping once per period.
    pub async fn run(self) {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            match self.sweep_once().await {
                Ok(0) => {}
                Ok(released) => info!("released {released} expired holds"),
                Err(error) => error!("expired hold scan failed: {error}"),
            }
        }
    }

    /// One sweep pass. Scans stale active holds and releases each; a
    /// per-hold failure is logged and never aborts the pass.
    ///
    /// # Errors
    ///
    /// Returns an error only when the scan itself fails.
    pub async fn sweep_once(&self) -> Result<u64, HoldsServiceError> {
        let expired = self.holds.find_expired_holds(Timestamp::now()).await?;

        let mut released = 0;

        for hold in &expired {
            match self.holds.release_expired_hold(hold).await {
                Ok(true) => released += 1,
                Ok(false) => {}
                Err(error) => {
                    error!("failed to release hold {}: {error}", hold.id);
                }
            }
        }

        Ok(released)
    }
}
