//! In-memory progress recorder.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::{ProgressReporter, ProgressUpdate, SessionSnapshot};
use crate::util::serde::OwnerId;

/// Bounded in-memory recorder for testing and dev. Progress updates and
/// finished summaries are each capped at `max_updates`, dropping the oldest.
///
/// Clones share storage, so one clone can be handed to the scheduler while
/// another is kept for inspection.
#[derive(Clone)]
pub struct InMemoryProgressReporter {
    updates: Arc<Mutex<VecDeque<ProgressUpdate>>>,
    finished: Arc<Mutex<VecDeque<SessionSnapshot>>>,
    max_updates: usize,
}

impl InMemoryProgressReporter {
    /// Create a recorder keeping at most `max_updates` of each event kind.
    #[must_use]
    pub fn new(max_updates: usize) -> Self {
        Self {
            updates: Arc::new(Mutex::new(VecDeque::with_capacity(max_updates.min(1024)))),
            finished: Arc::new(Mutex::new(VecDeque::new())),
            max_updates,
        }
    }

    /// Snapshot of recorded progress updates, oldest first.
    #[must_use]
    pub fn updates(&self) -> Vec<ProgressUpdate> {
        self.updates.lock().iter().copied().collect()
    }

    /// Summaries of sessions that left the registry.
    #[must_use]
    pub fn finished(&self) -> Vec<SessionSnapshot> {
        self.finished.lock().iter().cloned().collect()
    }

    /// Most recent progress reported for `owner`.
    #[must_use]
    pub fn latest(&self, owner: OwnerId) -> Option<f64> {
        self.updates
            .lock()
            .iter()
            .rev()
            .find(|u| u.owner == owner)
            .map(|u| u.progress)
    }
}

impl ProgressReporter for InMemoryProgressReporter {
    fn report(&mut self, update: ProgressUpdate) {
        push_bounded(&mut *self.updates.lock(), update, self.max_updates);
    }

    fn finished(&mut self, summary: &SessionSnapshot) {
        push_bounded(&mut *self.finished.lock(), summary.clone(), self.max_updates);
    }
}

fn push_bounded<T>(buf: &mut VecDeque<T>, item: T, max: usize) {
    if max == 0 {
        return;
    }
    if buf.len() >= max {
        buf.pop_front();
    }
    buf.push_back(item);
}
