//! Control-surface request/response models.
//!
//! Network, CLI, or GUI adapters decode their own framing into
//! [`ControlRequest`] and hand it to [`handle_request`].

use serde::{Deserialize, Serialize};

use crate::core::{
    CellKind, CellRemover, EligibilityPolicy, EmptyAllowList, FilterMode, MiningError, Region,
    Scheduler, SessionSnapshot, SessionStatus, WorldReader,
};
use crate::util::serde::OwnerId;

/// Start request payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartRequest {
    /// Requesting owner.
    pub owner: OwnerId,
    /// Region to mine, corners in any order.
    pub region: Region,
    /// Which list applies.
    #[serde(default)]
    pub mode: FilterMode,
    /// Allow list for Allow mode.
    #[serde(default)]
    pub allow: Vec<CellKind>,
    /// Deny list for Deny mode.
    #[serde(default)]
    pub deny: Vec<CellKind>,
    /// Empty allow-list behavior; the scheduler default applies when unset.
    #[serde(default)]
    pub empty_allow_list: Option<EmptyAllowList>,
    /// Requested items per tick.
    pub speed: f64,
    /// Enumerate across ticks instead of before returning.
    #[serde(default)]
    pub deferred: bool,
}

impl StartRequest {
    /// Eligibility policy described by the request.
    #[must_use]
    pub fn policy(&self, default_empty: EmptyAllowList) -> EligibilityPolicy {
        EligibilityPolicy {
            mode: self.mode,
            allow: self.allow.iter().cloned().collect(),
            deny: self.deny.iter().cloned().collect(),
            empty_allow_list: self.empty_allow_list.unwrap_or(default_empty),
        }
    }
}

/// Control operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ControlRequest {
    /// Start mining.
    Start(StartRequest),
    /// Stop the owner's session.
    Stop {
        /// Target owner.
        owner: OwnerId,
    },
    /// Pause the owner's session.
    Pause {
        /// Target owner.
        owner: OwnerId,
    },
    /// Resume the owner's session.
    Resume {
        /// Target owner.
        owner: OwnerId,
    },
    /// Query the owner's session.
    Status {
        /// Target owner.
        owner: OwnerId,
    },
}

/// Control operation outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlResponse {
    /// Whether the request succeeded.
    pub ok: bool,
    /// Owner the request targeted.
    pub owner: OwnerId,
    /// Session status after the request, if a session exists.
    pub status: Option<SessionStatus>,
    /// Full snapshot for start and status requests.
    pub snapshot: Option<SessionSnapshot>,
    /// Whether a start request created a new session.
    #[serde(default)]
    pub created: bool,
    /// Error message when `ok` is false.
    pub error: Option<String>,
}

impl ControlResponse {
    fn status_only(owner: OwnerId, status: Option<SessionStatus>) -> Self {
        Self {
            ok: true,
            owner,
            status,
            snapshot: None,
            created: false,
            error: None,
        }
    }

    fn with_snapshot(snapshot: SessionSnapshot, created: bool) -> Self {
        Self {
            ok: true,
            owner: snapshot.owner,
            status: Some(snapshot.status),
            snapshot: Some(snapshot),
            created,
            error: None,
        }
    }

    fn failure(owner: OwnerId, err: &MiningError) -> Self {
        Self {
            ok: false,
            owner,
            status: None,
            snapshot: None,
            created: false,
            error: Some(err.to_string()),
        }
    }
}

/// Snapshot for `owner`, or `NotFound`.
pub fn fetch_status<W, C>(
    scheduler: &Scheduler<W, C>,
    owner: OwnerId,
) -> Result<SessionSnapshot, MiningError>
where
    W: WorldReader,
    C: CellRemover,
{
    scheduler.status(owner).ok_or(MiningError::NotFound(owner))
}

/// Apply a control request. Stop, pause, and resume on unknown owners
/// succeed as no-ops with no status.
pub fn handle_request<W, C>(scheduler: &Scheduler<W, C>, req: ControlRequest) -> ControlResponse
where
    W: WorldReader,
    C: CellRemover,
{
    match req {
        ControlRequest::Start(start) => {
            let policy = start.policy(scheduler.config().default_empty_allow_list);
            let outcome = if start.deferred {
                scheduler.register_deferred(start.owner, start.region, policy, start.speed)
            } else {
                scheduler.register_and_start(start.owner, start.region, &policy, start.speed)
            };
            match outcome {
                Ok(outcome) => {
                    let created = outcome.is_new();
                    ControlResponse::with_snapshot(outcome.into_snapshot(), created)
                }
                Err(e) => {
                    tracing::warn!(owner = %start.owner, "start request failed: {}", e);
                    ControlResponse::failure(start.owner, &e)
                }
            }
        }
        ControlRequest::Stop { owner } => ControlResponse::status_only(owner, scheduler.stop(owner)),
        ControlRequest::Pause { owner } => ControlResponse::status_only(owner, scheduler.pause(owner)),
        ControlRequest::Resume { owner } => {
            ControlResponse::status_only(owner, scheduler.resume(owner))
        }
        ControlRequest::Status { owner } => match fetch_status(scheduler, owner) {
            Ok(snapshot) => ControlResponse::with_snapshot(snapshot, false),
            Err(e) => ControlResponse::failure(owner, &e),
        },
    }
}

/// Decode a JSON request, apply it, and encode the response.
pub fn handle_json<W, C>(scheduler: &Scheduler<W, C>, input: &str) -> Result<String, serde_json::Error>
where
    W: WorldReader,
    C: CellRemover,
{
    let req: ControlRequest = serde_json::from_str(input)?;
    serde_json::to_string(&handle_request(scheduler, req))
}
