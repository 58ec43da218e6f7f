//! Dedicated OS thread that calls [`Scheduler::tick`] at a fixed interval.

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{bounded, select, tick, Sender};

use crate::core::{CellRemover, Scheduler, WorldReader};

/// Background ticker on a named OS thread.
///
/// Dropping the driver stops the thread and joins it.
pub struct ThreadTickDriver {
    shutdown: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
    ticks: Arc<AtomicU64>,
}

impl ThreadTickDriver {
    /// Start ticking `scheduler` every `interval`.
    pub fn spawn<W, C>(scheduler: Arc<Scheduler<W, C>>, interval: Duration) -> io::Result<Self>
    where
        W: WorldReader + 'static,
        C: CellRemover + 'static,
    {
        let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
        let ticks = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&ticks);

        let handle = std::thread::Builder::new()
            .name("area-miner-tick".into())
            .spawn(move || {
                let ticker = tick(interval);
                tracing::debug!(interval_ms = interval.as_millis(), "tick driver started");
                loop {
                    select! {
                        recv(ticker) -> _ => {
                            scheduler.tick();
                            counter.fetch_add(1, Ordering::Relaxed);
                        }
                        // Fires on an explicit send or when the sender is dropped.
                        recv(shutdown_rx) -> _ => break,
                    }
                }
                tracing::debug!(ticks = counter.load(Ordering::Relaxed), "tick driver stopped");
            })?;

        Ok(Self {
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
            ticks,
        })
    }

    /// Ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Stop the thread, wait for it, and return how many ticks it ran.
    pub fn shutdown(mut self) -> u64 {
        self.stop();
        self.ticks()
    }

    fn stop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.try_send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("tick driver thread panicked");
            }
        }
    }
}

impl Drop for ThreadTickDriver {
    fn drop(&mut self) {
        self.stop();
    }
}
