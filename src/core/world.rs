//! Host world access boundary.
//!
//! The scheduler never owns cell storage. Hosts hand it a [`WorldReader`] for
//! enumeration and a [`CellRemover`] for the per-item side effect.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::region::Coordinate;

/// Classification of what occupies a cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    /// Nothing there. Missing or unreadable cells are also reported as empty.
    Empty,
    /// A named material such as `stone` or `dirt`.
    Material(String),
}

impl CellKind {
    /// Shorthand for [`CellKind::Material`].
    pub fn material(name: impl Into<String>) -> Self {
        Self::Material(name.into())
    }

    /// Whether the cell is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty"),
            Self::Material(name) => f.write_str(name),
        }
    }
}

/// Outcome of a single removal attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalOutcome {
    /// The cell held content and it was removed.
    Removed,
    /// The cell was already empty when the removal ran.
    AlreadyEmpty,
}

/// Read access to cell contents, used during work-list enumeration.
pub trait WorldReader: Send + Sync {
    /// Kind of the cell at `at`. Unreadable cells report [`CellKind::Empty`].
    fn cell_kind(&self, at: Coordinate) -> CellKind;
}

/// Removal side effect invoked once per work-list item.
pub trait CellRemover: Send + Sync {
    /// Remove whatever occupies `at`.
    fn remove(&self, at: Coordinate) -> RemovalOutcome;
}

impl<T: WorldReader + ?Sized> WorldReader for Arc<T> {
    fn cell_kind(&self, at: Coordinate) -> CellKind {
        (**self).cell_kind(at)
    }
}

impl<T: CellRemover + ?Sized> CellRemover for Arc<T> {
    fn remove(&self, at: Coordinate) -> RemovalOutcome {
        (**self).remove(at)
    }
}
