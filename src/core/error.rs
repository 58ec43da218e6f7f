//! Error types for mining scheduler operations.

use thiserror::Error;

use crate::util::serde::OwnerId;

/// Errors produced by scheduler components.
///
/// Every variant is local to one session request; none of them is raised from
/// inside a tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MiningError {
    /// Region volume exceeds the configured cap; no session was created.
    #[error("region volume {volume} exceeds maximum {max}")]
    OversizedRegion {
        /// Volume of the rejected region.
        volume: u64,
        /// Configured maximum volume.
        max: u64,
    },
    /// Owner already has a running session and the duplicate policy rejects.
    #[error("session already active for owner {0}")]
    SessionAlreadyActive(OwnerId),
    /// No session registered for the owner.
    #[error("no session for owner {0}")]
    NotFound(OwnerId),
    /// Speed is non-finite or non-positive.
    #[error("invalid speed: {0}")]
    InvalidSpeed(f64),
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
