//! Reporter that forwards events into a crossbeam channel.

use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};

use crate::core::{ProgressReporter, ProgressUpdate, SessionSnapshot};

/// Event delivered on the channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ReporterEvent {
    /// Periodic progress.
    Progress(ProgressUpdate),
    /// Session left the registry.
    Finished(SessionSnapshot),
}

/// Pushes events to a receiver owned by the notification layer.
///
/// Sends never block the tick: on a full channel the event is dropped, and a
/// disconnected receiver silences the reporter.
#[derive(Debug, Clone)]
pub struct ChannelProgressReporter {
    tx: Sender<ReporterEvent>,
}

impl ChannelProgressReporter {
    /// Reporter over a bounded channel of `capacity` events.
    #[must_use]
    pub fn bounded(capacity: usize) -> (Self, Receiver<ReporterEvent>) {
        let (tx, rx) = bounded(capacity);
        (Self { tx }, rx)
    }

    /// Reporter over an unbounded channel.
    #[must_use]
    pub fn unbounded() -> (Self, Receiver<ReporterEvent>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }

    fn send(&self, event: ReporterEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => tracing::debug!("progress channel full, event dropped"),
            Err(TrySendError::Disconnected(_)) => {
                tracing::trace!("progress channel disconnected");
            }
        }
    }
}

impl ProgressReporter for ChannelProgressReporter {
    fn report(&mut self, update: ProgressUpdate) {
        self.send(ReporterEvent::Progress(update));
    }

    fn finished(&mut self, summary: &SessionSnapshot) {
        self.send(ReporterEvent::Finished(summary.clone()));
    }
}
