//! In-memory sparse voxel world.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::core::{CellKind, CellRemover, Coordinate, Region, RemovalOutcome, WorldReader};

/// Sparse cell storage for development, tests, and hosts without their own
/// block store. Absent coordinates read as [`CellKind::Empty`].
#[derive(Debug, Default)]
pub struct InMemoryWorld {
    cells: RwLock<HashMap<Coordinate, CellKind>>,
}

impl InMemoryWorld {
    /// Create an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a single cell. Setting [`CellKind::Empty`] clears it.
    pub fn set(&self, at: Coordinate, kind: CellKind) {
        let mut cells = self.cells.write();
        if kind.is_empty() {
            cells.remove(&at);
        } else {
            cells.insert(at, kind);
        }
    }

    /// Fill every cell of `region` with `kind`.
    pub fn fill(&self, region: &Region, kind: &CellKind) {
        let (min, max) = (region.min(), region.max());
        let mut cells = self.cells.write();
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                for z in min.z..=max.z {
                    let at = Coordinate::new(x, y, z);
                    if kind.is_empty() {
                        cells.remove(&at);
                    } else {
                        cells.insert(at, kind.clone());
                    }
                }
            }
        }
    }

    /// Kind stored at `at`.
    #[must_use]
    pub fn get(&self, at: Coordinate) -> CellKind {
        self.cells.read().get(&at).cloned().unwrap_or(CellKind::Empty)
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.cells.read().len()
    }

    /// Number of cells holding `kind`.
    #[must_use]
    pub fn count_of(&self, kind: &CellKind) -> usize {
        self.cells.read().values().filter(|k| *k == kind).count()
    }
}

impl WorldReader for InMemoryWorld {
    fn cell_kind(&self, at: Coordinate) -> CellKind {
        self.get(at)
    }
}

impl CellRemover for InMemoryWorld {
    fn remove(&self, at: Coordinate) -> RemovalOutcome {
        match self.cells.write().remove(&at) {
            Some(_) => RemovalOutcome::Removed,
            None => RemovalOutcome::AlreadyEmpty,
        }
    }
}
