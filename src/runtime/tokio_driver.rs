//! Tokio task that calls [`Scheduler::tick`] at a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::core::{CellRemover, Scheduler, WorldReader};

/// Background ticker spawned on a tokio runtime.
pub struct TokioTickDriver {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<u64>,
}

impl TokioTickDriver {
    /// Spawn the tick loop on `handle`.
    ///
    /// Ticks run inline on the task: the scheduler never awaits and a tick
    /// holds the registry lock only for the length of the pass.
    pub fn spawn<W, C>(scheduler: Arc<Scheduler<W, C>>, interval: Duration, handle: &Handle) -> Self
    where
        W: WorldReader + 'static,
        C: CellRemover + 'static,
    {
        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let handle = handle.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first interval tick completes immediately.
            ticker.tick().await;
            let mut ran = 0_u64;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        scheduler.tick();
                        ran += 1;
                    }
                    // The only value ever sent is the stop signal.
                    _ = shutdown_rx.changed() => break,
                }
            }
            tracing::debug!(ticks = ran, "tokio tick driver stopped");
            ran
        });
        Self { shutdown, handle }
    }

    /// Signal the loop to stop and return how many ticks it ran.
    pub async fn shutdown(self) -> u64 {
        let _ = self.shutdown.send(true);
        match self.handle.await {
            Ok(ran) => ran,
            Err(e) => {
                tracing::error!("tokio tick driver task failed: {}", e);
                0
            }
        }
    }
}
