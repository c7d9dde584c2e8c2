//! Reservation expiry sweeper
//!
//! Periodic task that drives reservations past deadline through the same
//! `Expire` transition manual calls use. Safe to run alongside request
//! handling and alongside itself: the transition table rejects anything
//! that was resolved between the query and the write.

use crate::clock::Clock;
use crate::lifecycle::OrderEngine;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Periodic expiry task
///
/// Runs until the cancellation token fires. One sweep per interval; a
/// failing sweep logs and waits for the next tick.
pub struct ExpirySweeper {
    engine: Arc<OrderEngine>,
    clock: Arc<dyn Clock>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl ExpirySweeper {
    pub fn new(
        engine: Arc<OrderEngine>,
        clock: Arc<dyn Clock>,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            engine,
            clock,
            interval,
            shutdown,
        }
    }

    /// Main loop: sweep every interval until shutdown
    pub async fn run(self) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Expiry sweeper started");

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Expiry sweeper received shutdown signal");
                    break;
                }
            }

            let expired = self.engine.sweep_expired(self.clock.now());
            if expired > 0 {
                tracing::info!(expired, "Expired stale reservations");
            } else {
                tracing::debug!("Sweep found no stale reservations");
            }
        }

        tracing::info!("Expiry sweeper stopped");
    }
}
