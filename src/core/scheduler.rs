//! Session registry and tick-driven forward progress.
//!
//! The registry sits behind one `parking_lot::Mutex`; every mutation (tick,
//! start, pause, resume, stop) goes through it. Status queries read a
//! separate `RwLock` of published snapshots, which writers refresh while they
//! still hold the registry lock, so readers see snapshots in mutation order and
//! only contend with the tick for the length of a map update.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::config::{DuplicateSessionPolicy, MinerConfig};
use crate::core::eligibility::EligibilityPolicy;
use crate::core::region::Region;
use crate::core::reporter::{ProgressReporter, ProgressUpdate};
use crate::core::session::{Session, SessionSnapshot, SessionStatus, SpeedLimits};
use crate::core::work_list::{Enumeration, EnumerationStep, WorkListBuilder};
use crate::core::world::{CellRemover, WorldReader};
use crate::core::MiningError;
use crate::util::clock::now_ms;
use crate::util::serde::OwnerId;

/// Result of a start request.
#[derive(Debug, Clone, PartialEq)]
pub enum StartOutcome {
    /// A new session was registered and started.
    Started(SessionSnapshot),
    /// The owner already had a live session, which is returned unchanged.
    Existing(SessionSnapshot),
    /// Enumeration was queued; the session starts once it finishes.
    Pending(SessionSnapshot),
}

impl StartOutcome {
    /// Snapshot carried by any variant.
    #[must_use]
    pub const fn snapshot(&self) -> &SessionSnapshot {
        match self {
            Self::Started(s) | Self::Existing(s) | Self::Pending(s) => s,
        }
    }

    /// Take the snapshot out of any variant.
    #[must_use]
    pub fn into_snapshot(self) -> SessionSnapshot {
        match self {
            Self::Started(s) | Self::Existing(s) | Self::Pending(s) => s,
        }
    }

    /// Whether this request created something new.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        !matches!(self, Self::Existing(_))
    }
}

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Tick number, starting at 1.
    pub tick: u64,
    /// Work-list items processed across all sessions.
    pub items_processed: usize,
    /// Cells visited by deferred enumerations.
    pub cells_enumerated: u64,
    /// Sessions promoted from deferred enumeration and started.
    pub started: Vec<OwnerId>,
    /// Sessions removed after completing.
    pub completed: Vec<OwnerId>,
    /// Sessions removed after an explicit stop.
    pub stopped: Vec<OwnerId>,
    /// Sessions force-stopped for exceeding the maximum duration.
    pub expired: Vec<OwnerId>,
    /// Progress updates pushed to the reporter.
    pub reported: usize,
}

impl TickReport {
    fn record_reaped(&mut self, owner: OwnerId, status: SessionStatus) {
        match status {
            SessionStatus::Completed => self.completed.push(owner),
            SessionStatus::Stopped if !self.expired.contains(&owner) => self.stopped.push(owner),
            _ => {}
        }
    }
}

struct PendingBuild {
    owner: OwnerId,
    enumeration: Enumeration,
    speed: f64,
    requested_at_ms: u128,
}

impl PendingBuild {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            owner: self.owner,
            region: *self.enumeration.region(),
            status: SessionStatus::Idle,
            progress: 0.0,
            items_completed: 0,
            total: 0,
            cells_removed: 0,
            already_empty: 0,
            speed: self.speed,
            truncated: false,
            started_at_ms: self.requested_at_ms,
            elapsed_ms: now_ms().saturating_sub(self.requested_at_ms),
        }
    }
}

#[derive(Default)]
struct Registry {
    tick: u64,
    sessions: HashMap<OwnerId, Session>,
    pending: VecDeque<PendingBuild>,
}

impl Registry {
    fn live_snapshot(&self, owner: OwnerId) -> Option<SessionSnapshot> {
        if let Some(session) = self.sessions.get(&owner) {
            if !session.status().is_terminal() {
                return Some(session.snapshot());
            }
        }
        self.pending
            .iter()
            .find(|p| p.owner == owner)
            .map(PendingBuild::snapshot)
    }
}

/// Registry of one mining session per owner, advanced by [`Scheduler::tick`].
pub struct Scheduler<W, C> {
    config: MinerConfig,
    builder: WorkListBuilder,
    limits: SpeedLimits,
    world: Arc<W>,
    remover: Arc<C>,
    registry: Mutex<Registry>,
    snapshots: RwLock<HashMap<OwnerId, SessionSnapshot>>,
    reporter: Option<Mutex<Box<dyn ProgressReporter>>>,
}

impl<W, C> Scheduler<W, C>
where
    W: WorldReader,
    C: CellRemover,
{
    /// Create a scheduler over the given world capabilities.
    pub fn new(config: MinerConfig, world: Arc<W>, remover: Arc<C>) -> Result<Self, MiningError> {
        config.validate().map_err(MiningError::InvalidConfig)?;
        Ok(Self {
            builder: config.work_list_builder(),
            limits: config.speed_limits(),
            config,
            world,
            remover,
            registry: Mutex::new(Registry::default()),
            snapshots: RwLock::new(HashMap::new()),
            reporter: None,
        })
    }

    /// Attach a progress reporter.
    #[must_use]
    pub fn with_reporter(mut self, reporter: Box<dyn ProgressReporter>) -> Self {
        self.reporter = Some(Mutex::new(reporter));
        self
    }

    /// Active configuration.
    pub const fn config(&self) -> &MinerConfig {
        &self.config
    }

    /// Enumerate the region now, then register and start the session.
    ///
    /// Enumeration runs without holding the registry lock, so it never
    /// stalls a concurrent tick.
    pub fn register_and_start(
        &self,
        owner: OwnerId,
        region: Region,
        policy: &EligibilityPolicy,
        speed: f64,
    ) -> Result<StartOutcome, MiningError> {
        let speed = self.limits.clamp(speed)?;
        if let Some(existing) = self.registry.lock().live_snapshot(owner) {
            return self.on_duplicate(existing);
        }

        let work_list = self.builder.build(&region, policy, &*self.world)?;

        let mut registry = self.registry.lock();
        // Another caller may have started the same owner while we enumerated.
        if let Some(existing) = registry.live_snapshot(owner) {
            return self.on_duplicate(existing);
        }
        let mut session = Session::new(owner, region, work_list, speed, &self.limits, registry.tick)?;
        session.start();
        let snapshot = session.snapshot();
        let replaced = registry.sessions.insert(owner, session).map(|old| old.snapshot());
        self.snapshots.write().insert(owner, snapshot.clone());
        drop(registry);

        self.notify(Vec::new(), replaced.into_iter().collect());
        Ok(StartOutcome::Started(snapshot))
    }

    /// Queue the region for enumeration across ticks, charged against
    /// `enumeration_budget_per_tick`. Volume and speed are checked now.
    pub fn register_deferred(
        &self,
        owner: OwnerId,
        region: Region,
        policy: EligibilityPolicy,
        speed: f64,
    ) -> Result<StartOutcome, MiningError> {
        let speed = self.limits.clamp(speed)?;
        let mut registry = self.registry.lock();
        if let Some(existing) = registry.live_snapshot(owner) {
            return self.on_duplicate(existing);
        }
        let pending = PendingBuild {
            owner,
            enumeration: self.builder.begin(region, policy)?,
            speed,
            requested_at_ms: now_ms(),
        };
        let snapshot = pending.snapshot();
        registry.pending.push_back(pending);
        self.snapshots.write().insert(owner, snapshot.clone());
        tracing::debug!(%owner, volume = region.volume(), "deferred enumeration queued");
        Ok(StartOutcome::Pending(snapshot))
    }

    /// Advance every session by one tick and reap terminal ones.
    pub fn tick(&self) -> TickReport {
        let mut updates = Vec::new();
        let mut finished = Vec::new();

        let mut report = {
            let mut registry = self.registry.lock();
            registry.tick += 1;
            let tick = registry.tick;
            let mut report = TickReport {
                tick,
                ..TickReport::default()
            };
            self.step_pending(&mut registry, &mut report, &mut finished);

            let max_ticks = self.config.max_session_duration_ticks;
            let report_now = tick % self.config.reporting_interval_ticks == 0;
            for (owner, session) in &mut registry.sessions {
                if !session.status().is_terminal() && session.is_expired(tick, max_ticks) {
                    tracing::warn!(%owner, max_ticks, "mining session expired");
                    session.stop();
                    report.expired.push(*owner);
                    continue;
                }
                report.items_processed += session.advance(1, &*self.remover);
                if report_now && session.status() == SessionStatus::Active {
                    updates.push(ProgressUpdate {
                        owner: *owner,
                        progress: session.progress(),
                        tick,
                    });
                }
            }

            let Registry { sessions, pending, .. } = &mut *registry;
            let mut snapshots = self.snapshots.write();
            sessions.retain(|owner, session| {
                let snapshot = session.snapshot();
                if !snapshot.status.is_terminal() {
                    snapshots.insert(*owner, snapshot);
                    return true;
                }
                // A queued rebuild for the same owner keeps its Idle snapshot.
                if !pending.iter().any(|p| p.owner == *owner) {
                    snapshots.remove(owner);
                }
                report.record_reaped(*owner, snapshot.status);
                finished.push(snapshot);
                false
            });
            report
        };

        report.reported = updates.len();
        tracing::trace!(
            tick = report.tick,
            items = report.items_processed,
            reaped = finished.len(),
            "scheduler tick"
        );
        self.notify(updates, finished);
        report
    }

    /// Pause the owner's session. `None` if the owner has no session.
    pub fn pause(&self, owner: OwnerId) -> Option<SessionStatus> {
        self.control(owner, Session::pause)
    }

    /// Resume the owner's session. `None` if the owner has no session.
    pub fn resume(&self, owner: OwnerId) -> Option<SessionStatus> {
        self.control(owner, Session::resume)
    }

    /// Stop the owner's session, or cancel its queued enumeration.
    /// `None` if the owner has nothing registered.
    pub fn stop(&self, owner: OwnerId) -> Option<SessionStatus> {
        {
            let mut registry = self.registry.lock();
            if let Some(pos) = registry.pending.iter().position(|p| p.owner == owner) {
                registry.pending.remove(pos);
                self.snapshots.write().remove(&owner);
                tracing::info!(%owner, "deferred enumeration cancelled");
                return Some(SessionStatus::Stopped);
            }
        }
        self.control(owner, Session::stop)
    }

    /// Latest published snapshot for the owner.
    pub fn status(&self, owner: OwnerId) -> Option<SessionSnapshot> {
        let mut snapshot = self.snapshots.read().get(&owner).cloned()?;
        snapshot.elapsed_ms = now_ms().saturating_sub(snapshot.started_at_ms);
        Some(snapshot)
    }

    /// Whether the owner has a session that is currently Active.
    pub fn has_active_session(&self, owner: OwnerId) -> bool {
        self.snapshots
            .read()
            .get(&owner)
            .is_some_and(|s| s.status == SessionStatus::Active)
    }

    /// Owners whose sessions are currently Active.
    pub fn active_owners(&self) -> Vec<OwnerId> {
        self.snapshots
            .read()
            .values()
            .filter(|s| s.status == SessionStatus::Active)
            .map(|s| s.owner)
            .collect()
    }

    /// Registered sessions, including queued enumerations.
    pub fn len(&self) -> usize {
        self.snapshots.read().len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.snapshots.read().is_empty()
    }

    /// Number of ticks run so far.
    pub fn current_tick(&self) -> u64 {
        self.registry.lock().tick
    }

    fn control(&self, owner: OwnerId, op: fn(&mut Session) -> bool) -> Option<SessionStatus> {
        let mut registry = self.registry.lock();
        let queued = registry.pending.iter().any(|p| p.owner == owner);
        match registry.sessions.get_mut(&owner) {
            // A terminal session awaiting reaping is shadowed by the queued rebuild.
            Some(session) if !(queued && session.status().is_terminal()) => {
                op(session);
                let snapshot = session.snapshot();
                let status = snapshot.status;
                self.snapshots.write().insert(owner, snapshot);
                Some(status)
            }
            _ => queued.then_some(SessionStatus::Idle),
        }
    }

    fn on_duplicate(&self, existing: SessionSnapshot) -> Result<StartOutcome, MiningError> {
        match self.config.duplicate_policy {
            DuplicateSessionPolicy::ReturnExisting => {
                tracing::debug!(owner = %existing.owner, "start ignored: session already running");
                Ok(StartOutcome::Existing(existing))
            }
            DuplicateSessionPolicy::Reject => {
                tracing::warn!(owner = %existing.owner, "start rejected: session already running");
                Err(MiningError::SessionAlreadyActive(existing.owner))
            }
        }
    }

    fn step_pending(
        &self,
        registry: &mut Registry,
        report: &mut TickReport,
        finished: &mut Vec<SessionSnapshot>,
    ) {
        let mut budget = self.config.enumeration_budget_per_tick;
        while budget > 0 {
            let Some(front) = registry.pending.front_mut() else {
                break;
            };
            let visited = match front.enumeration.step(&*self.world, budget) {
                EnumerationStep::Pending { visited } => {
                    report.cells_enumerated += visited;
                    break;
                }
                EnumerationStep::Done { visited } => visited,
            };
            report.cells_enumerated += visited;
            budget = budget.saturating_sub(visited);

            let Some(done) = registry.pending.pop_front() else {
                break;
            };
            let region = *done.enumeration.region();
            let work_list = done.enumeration.finish();
            // Counted from the previous tick so the promoting tick's advance
            // is charged like a synchronous start's first tick.
            let started_at_tick = registry.tick.saturating_sub(1);
            match Session::new(done.owner, region, work_list, done.speed, &self.limits, started_at_tick) {
                Ok(mut session) => {
                    session.start();
                    report.started.push(done.owner);
                    if let Some(old) = registry.sessions.insert(done.owner, session) {
                        let summary = old.snapshot();
                        report.record_reaped(done.owner, summary.status);
                        finished.push(summary);
                    }
                }
                Err(e) => {
                    tracing::error!(owner = %done.owner, "deferred session dropped: {}", e);
                    self.snapshots.write().remove(&done.owner);
                }
            }
        }
    }

    fn notify(&self, updates: Vec<ProgressUpdate>, finished: Vec<SessionSnapshot>) {
        if updates.is_empty() && finished.is_empty() {
            return;
        }
        if let Some(reporter) = &self.reporter {
            let mut reporter = reporter.lock();
            for update in updates {
                reporter.report(update);
            }
            for summary in &finished {
                reporter.finished(summary);
            }
        }
    }
}
