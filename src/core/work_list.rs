//! Work-list enumeration over a region.
//!
//! Cells are visited `y` outermost, then `x`, then `z` innermost, each axis
//! ascending from `min` to `max`. Sessions therefore clear the lowest layer of
//! a region first.

use serde::{Deserialize, Serialize};

use crate::core::eligibility::{is_eligible, EligibilityPolicy};
use crate::core::region::{Coordinate, Region};
use crate::core::world::WorldReader;
use crate::core::MiningError;

/// Ordered coordinates a session will process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkList {
    items: Vec<Coordinate>,
    truncated: bool,
}

impl WorkList {
    /// Wrap an explicit list of coordinates.
    #[must_use]
    pub const fn from_coordinates(items: Vec<Coordinate>) -> Self {
        Self {
            items,
            truncated: false,
        }
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Coordinate> {
        self.items.get(index).copied()
    }

    /// All items in processing order.
    #[must_use]
    pub fn as_slice(&self) -> &[Coordinate] {
        &self.items
    }

    /// Whether the item cap cut enumeration short.
    #[must_use]
    pub const fn truncated(&self) -> bool {
        self.truncated
    }
}

/// Result of one [`Enumeration::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumerationStep {
    /// Cells remain to be visited.
    Pending {
        /// Cells visited by this call.
        visited: u64,
    },
    /// Enumeration is finished; call [`Enumeration::finish`].
    Done {
        /// Cells visited by this call.
        visited: u64,
    },
}

/// Builds work lists under a volume cap and an item cap.
#[derive(Debug, Clone, Copy)]
pub struct WorkListBuilder {
    max_items: usize,
    max_volume: u64,
}

impl WorkListBuilder {
    /// Create a builder with the given caps.
    #[must_use]
    pub const fn new(max_items: usize, max_volume: u64) -> Self {
        Self {
            max_items,
            max_volume,
        }
    }

    /// Maximum items per list.
    #[must_use]
    pub const fn max_items(&self) -> usize {
        self.max_items
    }

    /// Maximum region volume accepted.
    #[must_use]
    pub const fn max_volume(&self) -> u64 {
        self.max_volume
    }

    /// Start a resumable enumeration, rejecting oversized regions up front.
    pub fn begin(
        &self,
        region: Region,
        policy: EligibilityPolicy,
    ) -> Result<Enumeration, MiningError> {
        let volume = region.volume();
        if volume > self.max_volume {
            tracing::warn!(volume, max = self.max_volume, "region rejected as oversized");
            return Err(MiningError::OversizedRegion {
                volume,
                max: self.max_volume,
            });
        }
        let (width, _, depth) = region.extent();
        Ok(Enumeration {
            region,
            policy,
            max_items: self.max_items,
            volume,
            layer: width.saturating_mul(depth),
            depth,
            next_index: 0,
            items: Vec::new(),
            truncated: false,
        })
    }

    /// Enumerate the whole region in one call.
    pub fn build(
        &self,
        region: &Region,
        policy: &EligibilityPolicy,
        reader: &dyn WorldReader,
    ) -> Result<WorkList, MiningError> {
        let mut enumeration = self.begin(*region, policy.clone())?;
        enumeration.step(reader, u64::MAX);
        Ok(enumeration.finish())
    }
}

/// An in-progress enumeration that can be advanced a budget of cells at a time.
#[derive(Debug, Clone)]
pub struct Enumeration {
    region: Region,
    policy: EligibilityPolicy,
    max_items: usize,
    volume: u64,
    layer: u64,
    depth: u64,
    next_index: u64,
    items: Vec<Coordinate>,
    truncated: bool,
}

impl Enumeration {
    /// Region being enumerated.
    #[must_use]
    pub const fn region(&self) -> &Region {
        &self.region
    }

    /// Whether every cell has been visited or the item cap was reached.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.truncated || self.next_index >= self.volume
    }

    /// Cells visited so far.
    #[must_use]
    pub const fn visited(&self) -> u64 {
        self.next_index
    }

    /// Eligible coordinates collected so far.
    #[must_use]
    pub fn collected(&self) -> usize {
        self.items.len()
    }

    /// Visit up to `budget` more cells.
    pub fn step(&mut self, reader: &dyn WorldReader, budget: u64) -> EnumerationStep {
        let mut visited = 0;
        while visited < budget && !self.is_done() {
            if self.items.len() >= self.max_items {
                self.truncated = true;
                break;
            }
            let at = self.coordinate_at(self.next_index);
            self.next_index += 1;
            visited += 1;
            if is_eligible(&reader.cell_kind(at), &self.policy) {
                self.items.push(at);
            }
        }
        // A full list with cells left over is a truncation even if the budget
        // ran out on the very item that filled it.
        if self.items.len() >= self.max_items && self.next_index < self.volume {
            self.truncated = true;
        }
        if self.is_done() {
            EnumerationStep::Done { visited }
        } else {
            EnumerationStep::Pending { visited }
        }
    }

    /// Consume the enumeration and yield whatever was collected.
    #[must_use]
    pub fn finish(self) -> WorkList {
        if self.truncated {
            tracing::debug!(
                items = self.items.len(),
                visited = self.next_index,
                volume = self.volume,
                "work list truncated at item cap"
            );
        }
        WorkList {
            items: self.items,
            truncated: self.truncated,
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn coordinate_at(&self, index: u64) -> Coordinate {
        let min = self.region.min();
        let dy = index / self.layer;
        let rem = index % self.layer;
        let dx = rem / self.depth;
        let dz = rem % self.depth;
        // Offsets are bounded by the axis extent so the wrapping adds land
        // back inside the i32 range.
        Coordinate::new(
            min.x.wrapping_add(dx as i32),
            min.y.wrapping_add(dy as i32),
            min.z.wrapping_add(dz as i32),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::world::CellKind;

    struct Uniform(CellKind);

    impl WorldReader for Uniform {
        fn cell_kind(&self, _at: Coordinate) -> CellKind {
            self.0.clone()
        }
    }

    fn cube(n: i32) -> Region {
        Region::new(Coordinate::new(0, 0, 0), Coordinate::new(n - 1, n - 1, n - 1))
    }

    #[test]
    fn test_traversal_order_y_then_x_then_z() {
        let world = Uniform(CellKind::material("stone"));
        let list = WorkListBuilder::new(100, 100)
            .build(&cube(2), &EligibilityPolicy::default(), &world)
            .unwrap();
        let expected = [
            (0, 0, 0),
            (0, 0, 1),
            (1, 0, 0),
            (1, 0, 1),
            (0, 1, 0),
            (0, 1, 1),
            (1, 1, 0),
            (1, 1, 1),
        ]
        .map(Coordinate::from);
        assert_eq!(list.as_slice(), &expected);
        assert!(!list.truncated());
    }

    #[test]
    fn test_oversized_region_rejected() {
        let world = Uniform(CellKind::material("stone"));
        let region = Region::new(Coordinate::new(0, 0, 0), Coordinate::new(9, 1, 9));
        assert_eq!(region.volume(), 200);
        let err = WorkListBuilder::new(1000, 100)
            .build(&region, &EligibilityPolicy::default(), &world)
            .unwrap_err();
        assert_eq!(err, MiningError::OversizedRegion { volume: 200, max: 100 });
    }

    #[test]
    fn test_volume_equal_to_cap_accepted() {
        let world = Uniform(CellKind::material("stone"));
        let list = WorkListBuilder::new(1000, 27)
            .build(&cube(3), &EligibilityPolicy::default(), &world)
            .unwrap();
        assert_eq!(list.len(), 27);
    }

    #[test]
    fn test_item_cap_truncates() {
        let world = Uniform(CellKind::material("stone"));
        let list = WorkListBuilder::new(5, 1000)
            .build(&cube(3), &EligibilityPolicy::default(), &world)
            .unwrap();
        assert_eq!(list.len(), 5);
        assert!(list.truncated());
        assert_eq!(list.get(4), Some(Coordinate::new(1, 0, 1)));
    }

    #[test]
    fn test_item_cap_exactly_met_is_not_truncated() {
        let world = Uniform(CellKind::material("stone"));
        let list = WorkListBuilder::new(8, 1000)
            .build(&cube(2), &EligibilityPolicy::default(), &world)
            .unwrap();
        assert_eq!(list.len(), 8);
        assert!(!list.truncated());
    }

    #[test]
    fn test_empty_world_yields_empty_list() {
        let world = Uniform(CellKind::Empty);
        let list = WorkListBuilder::new(100, 100)
            .build(&cube(3), &EligibilityPolicy::default(), &world)
            .unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_stepwise_matches_single_shot() {
        let world = Uniform(CellKind::material("dirt"));
        let builder = WorkListBuilder::new(1000, 1000);
        let whole = builder
            .build(&cube(4), &EligibilityPolicy::default(), &world)
            .unwrap();

        assert_eq!(builder.max_items(), 1000);
        assert_eq!(builder.max_volume(), 1000);

        let mut enumeration = builder.begin(cube(4), EligibilityPolicy::default()).unwrap();
        let mut calls = 0;
        while let EnumerationStep::Pending { visited } = enumeration.step(&world, 7) {
            assert_eq!(visited, 7);
            calls += 1;
            assert_eq!(enumeration.collected(), calls * 7);
        }
        assert_eq!(enumeration.collected(), 64);
        assert_eq!(calls, 9);
        assert_eq!(enumeration.visited(), 64);
        assert_eq!(enumeration.finish(), whole);
    }

    #[test]
    fn test_negative_coordinates() {
        let world = Uniform(CellKind::material("dirt"));
        let region = Region::new(Coordinate::new(-1, -1, -1), Coordinate::new(-2, -2, -2));
        let list = WorkListBuilder::new(100, 100)
            .build(&region, &EligibilityPolicy::default(), &world)
            .unwrap();
        assert_eq!(list.get(0), Some(Coordinate::new(-2, -2, -2)));
        assert_eq!(list.get(7), Some(Coordinate::new(-1, -1, -1)));
    }
}
