//! Per-owner mining session state machine.

use serde::{Deserialize, Serialize};

use crate::core::region::Region;
use crate::core::work_list::WorkList;
use crate::core::world::{CellRemover, RemovalOutcome};
use crate::core::MiningError;
use crate::util::clock::now_ms;
use crate::util::serde::OwnerId;

/// Lifecycle status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Created but not started (or still enumerating).
    Idle,
    /// Removing cells on every tick.
    Active,
    /// Suspended by the owner; keeps its cursor.
    Paused,
    /// Work list exhausted.
    Completed,
    /// Stopped by the owner or by expiry.
    Stopped,
}

impl SessionStatus {
    /// Completed and Stopped are terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Stopped)
    }
}

/// Inclusive speed range, in items per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedLimits {
    /// Lowest accepted speed.
    pub min: f64,
    /// Highest accepted speed.
    pub max: f64,
}

impl Default for SpeedLimits {
    fn default() -> Self {
        Self { min: 0.1, max: 10.0 }
    }
}

impl SpeedLimits {
    /// Reject non-finite or non-positive speeds, then clamp into range.
    pub fn clamp(&self, speed: f64) -> Result<f64, MiningError> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(MiningError::InvalidSpeed(speed));
        }
        Ok(speed.clamp(self.min, self.max))
    }
}

/// Read-only projection of a session for status queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Session owner.
    pub owner: OwnerId,
    /// Region being mined.
    pub region: Region,
    /// Current status.
    pub status: SessionStatus,
    /// Fraction of the work list processed, in `[0, 1]`.
    pub progress: f64,
    /// Items processed so far.
    pub items_completed: u64,
    /// Work-list length.
    pub total: u64,
    /// Items that actually removed content.
    pub cells_removed: u64,
    /// Items whose cell was already empty.
    pub already_empty: u64,
    /// Effective (clamped) speed.
    pub speed: f64,
    /// Whether the work list hit the item cap.
    pub truncated: bool,
    /// Creation time in milliseconds since epoch.
    pub started_at_ms: u128,
    /// Wall-clock milliseconds between creation and when the snapshot was taken.
    pub elapsed_ms: u128,
}

/// One owner's bulk-removal operation over a region.
#[derive(Debug, Clone)]
pub struct Session {
    owner: OwnerId,
    region: Region,
    work_list: WorkList,
    cursor: usize,
    speed: f64,
    status: SessionStatus,
    items_completed: u64,
    cells_removed: u64,
    already_empty: u64,
    started_at_ms: u128,
    started_at_tick: u64,
    // Items owed are derived from the total of active ticks rather than a
    // running float sum, so `floor(ticks * speed)` holds exactly.
    active_ticks: u64,
    entitled: u64,
}

impl Session {
    /// Create an idle session; `speed` is validated and clamped to `limits`.
    pub fn new(
        owner: OwnerId,
        region: Region,
        work_list: WorkList,
        speed: f64,
        limits: &SpeedLimits,
        started_at_tick: u64,
    ) -> Result<Self, MiningError> {
        let speed = limits.clamp(speed)?;
        Ok(Self {
            owner,
            region,
            work_list,
            cursor: 0,
            speed,
            status: SessionStatus::Idle,
            items_completed: 0,
            cells_removed: 0,
            already_empty: 0,
            started_at_ms: now_ms(),
            started_at_tick,
            active_ticks: 0,
            entitled: 0,
        })
    }

    /// Session owner.
    #[must_use]
    pub const fn owner(&self) -> OwnerId {
        self.owner
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    /// Effective speed in items per tick.
    #[must_use]
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Index of the next work-list item.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Items processed so far.
    #[must_use]
    pub const fn items_completed(&self) -> u64 {
        self.items_completed
    }

    /// Work list captured at creation.
    #[must_use]
    pub const fn work_list(&self) -> &WorkList {
        &self.work_list
    }

    /// Scheduler tick on which the session was created.
    #[must_use]
    pub const fn started_at_tick(&self) -> u64 {
        self.started_at_tick
    }

    /// Fractional item credit carried into the next tick, in `[0, 1)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fractional_carry(&self) -> f64 {
        let accrued = self.active_ticks as f64 * self.speed;
        accrued - accrued.floor()
    }

    /// Idle -> Active. Returns whether the transition happened.
    pub fn start(&mut self) -> bool {
        if self.status != SessionStatus::Idle {
            return false;
        }
        self.status = SessionStatus::Active;
        tracing::info!(
            owner = %self.owner,
            items = self.work_list.len(),
            speed = self.speed,
            "mining session started"
        );
        true
    }

    /// Active -> Paused.
    pub fn pause(&mut self) -> bool {
        if self.status != SessionStatus::Active {
            return false;
        }
        self.status = SessionStatus::Paused;
        tracing::debug!(owner = %self.owner, cursor = self.cursor, "mining session paused");
        true
    }

    /// Paused -> Active.
    pub fn resume(&mut self) -> bool {
        if self.status != SessionStatus::Paused {
            return false;
        }
        self.status = SessionStatus::Active;
        tracing::debug!(owner = %self.owner, cursor = self.cursor, "mining session resumed");
        true
    }

    /// Any non-terminal status -> Stopped. Idempotent.
    pub fn stop(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = SessionStatus::Stopped;
        tracing::info!(
            owner = %self.owner,
            items = self.items_completed,
            removed = self.cells_removed,
            "mining session stopped"
        );
        true
    }

    /// Process the items owed for `ticks_elapsed` ticks. Only Active sessions
    /// make progress. Returns the number of items processed by this call.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn advance(&mut self, ticks_elapsed: u64, remover: &dyn CellRemover) -> usize {
        if self.status != SessionStatus::Active {
            return 0;
        }
        self.active_ticks = self.active_ticks.saturating_add(ticks_elapsed);
        let entitled = (self.active_ticks as f64 * self.speed).floor() as u64;
        let owed = entitled.saturating_sub(self.entitled);
        self.entitled = entitled;

        let mut processed = 0usize;
        while (processed as u64) < owed {
            let Some(at) = self.work_list.get(self.cursor) else {
                break;
            };
            match remover.remove(at) {
                RemovalOutcome::Removed => self.cells_removed += 1,
                RemovalOutcome::AlreadyEmpty => self.already_empty += 1,
            }
            self.cursor += 1;
            self.items_completed += 1;
            processed += 1;
        }

        if self.cursor >= self.work_list.len() {
            self.complete();
        }
        processed
    }

    /// Fraction processed; 1.0 for an empty work list.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        if self.work_list.is_empty() {
            return 1.0;
        }
        self.items_completed as f64 / self.work_list.len() as f64
    }

    /// Whether the session has outlived `max_ticks` as of `now_tick`.
    #[must_use]
    pub const fn is_expired(&self, now_tick: u64, max_ticks: u64) -> bool {
        now_tick.saturating_sub(self.started_at_tick) > max_ticks
    }

    /// Read-only projection.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            owner: self.owner,
            region: self.region,
            status: self.status,
            progress: self.progress(),
            items_completed: self.items_completed,
            total: self.work_list.len() as u64,
            cells_removed: self.cells_removed,
            already_empty: self.already_empty,
            speed: self.speed,
            truncated: self.work_list.truncated(),
            started_at_ms: self.started_at_ms,
            elapsed_ms: now_ms().saturating_sub(self.started_at_ms),
        }
    }

    fn complete(&mut self) {
        self.status = SessionStatus::Completed;
        tracing::info!(
            owner = %self.owner,
            items = self.items_completed,
            removed = self.cells_removed,
            elapsed_ms = %now_ms().saturating_sub(self.started_at_ms),
            "mining session completed"
        );
    }
}
