//! Integer coordinates and normalized axis-aligned regions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell position in the voxel volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    /// X axis.
    pub x: i32,
    /// Y axis (vertical).
    pub y: i32,
    /// Z axis.
    pub z: i32,
}

impl Coordinate {
    /// Create a coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl From<(i32, i32, i32)> for Coordinate {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Component-wise min/max of two corners.
#[must_use]
pub fn normalize(a: Coordinate, b: Coordinate) -> (Coordinate, Coordinate) {
    (
        Coordinate::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
        Coordinate::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
    )
}

/// Axis-aligned bounding box with inclusive bounds.
///
/// Corners may be given in any order; they are normalized on construction so
/// `min <= max` holds on every axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RegionCorners", into = "RegionCorners")]
pub struct Region {
    min: Coordinate,
    max: Coordinate,
}

/// Wire form of a region: two corners in any order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RegionCorners {
    /// First corner.
    pub corner_a: Coordinate,
    /// Opposite corner.
    pub corner_b: Coordinate,
}

impl From<RegionCorners> for Region {
    fn from(c: RegionCorners) -> Self {
        Self::new(c.corner_a, c.corner_b)
    }
}

impl From<Region> for RegionCorners {
    fn from(r: Region) -> Self {
        Self {
            corner_a: r.min,
            corner_b: r.max,
        }
    }
}

impl Region {
    /// Build a region from two arbitrary corners.
    #[must_use]
    pub fn new(corner_a: Coordinate, corner_b: Coordinate) -> Self {
        let (min, max) = normalize(corner_a, corner_b);
        Self { min, max }
    }

    /// Lowest corner.
    #[must_use]
    pub const fn min(&self) -> Coordinate {
        self.min
    }

    /// Highest corner.
    #[must_use]
    pub const fn max(&self) -> Coordinate {
        self.max
    }

    /// Per-axis extents as `(width, height, depth)` along `(x, y, z)`.
    #[must_use]
    pub fn extent(&self) -> (u64, u64, u64) {
        (
            axis_extent(self.min.x, self.max.x),
            axis_extent(self.min.y, self.max.y),
            axis_extent(self.min.z, self.max.z),
        )
    }

    /// Number of cells, saturating at `u64::MAX`.
    #[must_use]
    pub fn volume(&self) -> u64 {
        let (w, h, d) = self.extent();
        w.saturating_mul(h).saturating_mul(d)
    }

    /// Inclusive containment check.
    #[must_use]
    pub fn contains(&self, c: Coordinate) -> bool {
        (self.min.x..=self.max.x).contains(&c.x)
            && (self.min.y..=self.max.y).contains(&c.y)
            && (self.min.z..=self.max.z).contains(&c.z)
    }
}

fn axis_extent(lo: i32, hi: i32) -> u64 {
    u64::from(lo.abs_diff(hi)) + 1
}
