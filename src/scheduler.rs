//! Fixed-cadence refresh loop.
//!
//! Runs a synchronous refresh job on every tick of a `tokio` interval. The
//! first tick fires immediately. A refresh always finishes before the next
//! tick is awaited, and ticks missed while a refresh ran are skipped rather
//! than replayed.

use crate::domain::error::TickerscopeError;
use std::future::Future;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshScheduler {
    cadence: Duration,
    max_ticks: Option<usize>,
}

impl RefreshScheduler {
    pub fn new(cadence_seconds: u64) -> Result<Self, TickerscopeError> {
        if cadence_seconds == 0 {
            return Err(TickerscopeError::invalid(
                "dashboard",
                "refresh_seconds",
                "refresh cadence must be at least one second",
            ));
        }
        Ok(Self {
            cadence: Duration::from_secs(cadence_seconds),
            max_ticks: None,
        })
    }

    /// Stop after `ticks` refreshes. `0` means no limit.
    pub fn with_max_ticks(mut self, ticks: usize) -> Self {
        self.max_ticks = (ticks > 0).then_some(ticks);
        self
    }

    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    /// Runs until Ctrl-C or the tick limit. Returns the number of refreshes.
    pub async fn run<F>(&self, job: F) -> usize
    where
        F: FnMut(usize),
    {
        self.run_until(job, interrupt(tokio::signal::ctrl_c())).await
    }

    /// Runs until `shutdown` resolves or the tick limit is reached.
    pub async fn run_until<F, S>(&self, mut job: F, shutdown: S) -> usize
    where
        F: FnMut(usize),
        S: Future<Output = ()>,
    {
        let mut ticker = interval(self.cadence);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        info!(
            cadence_secs = self.cadence.as_secs(),
            max_ticks = ?self.max_ticks,
            "refresh loop started"
        );

        let mut ticks = 0usize;
        loop {
            if self.max_ticks.is_some_and(|max| ticks >= max) {
                break;
            }
            tokio::select! {
                _ = ticker.tick() => {
                    ticks += 1;
                    debug!(tick = ticks, "refresh");
                    job(ticks);
                }
                _ = &mut shutdown => break,
            }
        }

        info!(ticks, "refresh loop stopped");
        ticks
    }
}

/// Resolves when `signal` fires. If the handler could not be installed it
/// never resolves, leaving the tick limit as the only stop condition.
async fn interrupt<S>(signal: S)
where
    S: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("interrupt received, stopping refresh loop"),
        Err(e) => {
            warn!(error = %e, "cannot listen for Ctrl-C, refresh loop runs until its tick limit");
            std::future::pending::<()>().await;
        }
    }
}
