//! Progress reporter boundary.
//!
//! The scheduler pushes updates through this trait on its reporting cadence.
//! Implementations live in [`crate::infra::reporter`] or in the host.

use serde::{Deserialize, Serialize};

use crate::core::session::SessionSnapshot;
use crate::util::serde::OwnerId;

/// Periodic progress notification for one session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Session owner.
    pub owner: OwnerId,
    /// Progress in `[0, 1]`.
    pub progress: f64,
    /// Scheduler tick that produced the update.
    pub tick: u64,
}

/// Receiver of progress notifications.
pub trait ProgressReporter: Send {
    /// Publish a periodic progress update.
    fn report(&mut self, update: ProgressUpdate);

    /// Called once when a session leaves the registry.
    fn finished(&mut self, _summary: &SessionSnapshot) {}
}
