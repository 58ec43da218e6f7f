//! Reporter that writes progress to the tracing subscriber.

use crate::core::{ProgressReporter, ProgressUpdate, SessionSnapshot};

/// Logs every update at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgressReporter;

impl ProgressReporter for TracingProgressReporter {
    fn report(&mut self, update: ProgressUpdate) {
        tracing::info!(
            owner = %update.owner,
            tick = update.tick,
            "mining progress {:.1}%",
            update.progress * 100.0
        );
    }

    fn finished(&mut self, summary: &SessionSnapshot) {
        tracing::info!(
            owner = %summary.owner,
            status = ?summary.status,
            items = summary.items_completed,
            total = summary.total,
            "mining session finished"
        );
    }
}
