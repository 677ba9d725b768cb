//! Footprint geometry: floor-plane points, axis-aligned boxes, and overlap tests.
//!
//! Everything here is pure. Footprints are treated as axis-aligned after the
//! item's yaw is snapped to the nearest cardinal direction, so an odd number
//! of quarter turns swaps width and depth.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

use crate::consts::QUARTER_TURN;

/// A point or displacement on the floor plane (X right, Z towards the back wall).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub z: f64,
}

impl Vec2 {
    #[must_use]
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    /// Euclidean length of this displacement.
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.z)
    }

    /// Distance between two points.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.z == 0.0
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, z: self.z + rhs.z }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, z: self.z - rhs.z }
    }
}

/// World-space axis-aligned rectangle on the floor plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min_x: f64,
    pub max_x: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Aabb {
    /// Box centered on `center` with the given half extents.
    #[must_use]
    pub fn from_center(center: Vec2, half_x: f64, half_z: f64) -> Self {
        Self {
            min_x: center.x - half_x,
            max_x: center.x + half_x,
            min_z: center.z - half_z,
            max_z: center.z + half_z,
        }
    }

    /// Grow (positive) or shrink (negative) every side by `amount`.
    #[must_use]
    pub fn inflate(self, amount: f64) -> Self {
        Self {
            min_x: self.min_x - amount,
            max_x: self.max_x + amount,
            min_z: self.min_z - amount,
            max_z: self.max_z + amount,
        }
    }

    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new((self.min_x + self.max_x) / 2.0, (self.min_z + self.max_z) / 2.0)
    }

    #[must_use]
    pub fn half_x(&self) -> f64 {
        (self.max_x - self.min_x) / 2.0
    }

    #[must_use]
    pub fn half_z(&self) -> f64 {
        (self.max_z - self.min_z) / 2.0
    }
}

/// Number of cardinal quarter turns (0..=3) nearest to `rotation` radians.
#[must_use]
pub fn quarter_turns(rotation: f64) -> u8 {
    #[allow(clippy::cast_possible_truncation, reason = "rem_euclid(4) keeps the value in 0..4")]
    let turns = (rotation / QUARTER_TURN).round().rem_euclid(4.0) as u8;
    turns % 4
}

/// Half extents `(x, z)` of a `width` x `depth` footprint after rotation.
///
/// # Panics
///
/// Panics if `width` or `depth` is not strictly positive; a malformed
/// footprint is a caller contract violation.
#[must_use]
pub fn half_extents(width: f64, depth: f64, rotation: f64) -> (f64, f64) {
    assert!(width > 0.0 && depth > 0.0, "invalid footprint {width} x {depth}");
    if quarter_turns(rotation) % 2 == 1 {
        (depth / 2.0, width / 2.0)
    } else {
        (width / 2.0, depth / 2.0)
    }
}

/// World-space AABB of a footprint centered at `center`, with an optional
/// inflation margin applied to every side.
///
/// # Panics
///
/// Panics on a non-positive `width` or `depth` (see [`half_extents`]).
#[must_use]
pub fn compute_aabb(width: f64, depth: f64, center: Vec2, rotation: f64, inflate: f64) -> Aabb {
    let (hx, hz) = half_extents(width, depth, rotation);
    Aabb::from_center(center, hx, hz).inflate(inflate)
}

/// Strict overlap test with both boxes grown by `margin`.
///
/// Edge-touching boxes do not overlap at `margin == 0`.
#[must_use]
pub fn overlaps(a: &Aabb, b: &Aabb, margin: f64) -> bool {
    a.min_x - margin < b.max_x + margin
        && a.max_x + margin > b.min_x - margin
        && a.min_z - margin < b.max_z + margin
        && a.max_z + margin > b.min_z - margin
}
