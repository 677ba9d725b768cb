//! Wall-relative coordinates: wall id + offset to world pose and back.
//!
//! The room is centered on the origin. `back` is the line `z = +depth/2`,
//! `front` is `z = -depth/2`, `right` is `x = +width/2` and `left` is
//! `x = -width/2`. An item on a wall faces into the room, so its width runs
//! along the wall and its depth protrudes towards the center.

#[cfg(test)]
#[path = "wall_test.rs"]
mod wall_test;

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::LIMIT_EPSILON;
use crate::doc::Room;
use crate::geom::{Aabb, Vec2};

/// One of the four room walls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Wall {
    Back,
    Front,
    Left,
    Right,
}

impl Wall {
    /// Fixed order in which the placement solver tries walls.
    pub const PLACEMENT_ORDER: [Wall; 4] = [Wall::Back, Wall::Right, Wall::Front, Wall::Left];

    /// Canonical yaw for an item standing against this wall, facing into the room.
    #[must_use]
    pub fn rotation(self) -> f64 {
        match self {
            Self::Back => PI,
            Self::Front => 0.0,
            Self::Right => -FRAC_PI_2,
            Self::Left => FRAC_PI_2,
        }
    }

    /// Whether the wall runs along the X axis (`back` / `front`).
    #[must_use]
    pub fn runs_along_x(self) -> bool {
        matches!(self, Self::Back | Self::Front)
    }

    /// `+1.0` for walls on the positive side of their axis, `-1.0` otherwise.
    fn sign(self) -> f64 {
        match self {
            Self::Back | Self::Right => 1.0,
            Self::Front | Self::Left => -1.0,
        }
    }

    /// Half the room extent along this wall.
    #[must_use]
    pub fn half_length(self, room: &Room) -> f64 {
        if self.runs_along_x() { room.width / 2.0 } else { room.depth / 2.0 }
    }

    /// Coordinate of the wall line on its perpendicular axis.
    #[must_use]
    pub fn line(self, room: &Room) -> f64 {
        let half = if self.runs_along_x() { room.depth / 2.0 } else { room.width / 2.0 };
        self.sign() * half
    }

    /// Off-axis coordinate of an item center that hugs this wall.
    #[must_use]
    pub fn inset(self, room: &Room, protrude_half: f64, padding: f64) -> f64 {
        self.line(room) - self.sign() * (protrude_half + padding)
    }

    /// The component of `p` that runs along this wall.
    #[must_use]
    pub fn along(self, p: Vec2) -> f64 {
        if self.runs_along_x() { p.x } else { p.z }
    }

    /// Build a point from an along-wall and an off-axis coordinate.
    #[must_use]
    pub fn compose(self, along: f64, off_axis: f64) -> Vec2 {
        if self.runs_along_x() {
            Vec2::new(along, off_axis)
        } else {
            Vec2::new(off_axis, along)
        }
    }

    /// Half extents `(along, protruding)` of a footprint box relative to this wall.
    #[must_use]
    pub fn split_extents(self, footprint: &Aabb) -> (f64, f64) {
        if self.runs_along_x() {
            (footprint.half_x(), footprint.half_z())
        } else {
            (footprint.half_z(), footprint.half_x())
        }
    }

    /// Lower-case wall name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Back => "back",
            Self::Front => "front",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Wall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown wall `{0}` (expected back, front, left or right)")]
pub struct ParseWallError(pub String);

impl FromStr for Wall {
    type Err = ParseWallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "back" => Ok(Self::Back),
            "front" => Ok(Self::Front),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(ParseWallError(other.to_owned())),
        }
    }
}

/// World pose for an item placed against a wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallPose {
    pub position: Vec2,
    pub rotation: f64,
}

/// Inclusive range an item's centerline may occupy along its wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelLimit {
    pub min: f64,
    pub max: f64,
}

impl TravelLimit {
    /// True when the item is too wide to fit on the wall at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min > self.max + LIMIT_EPSILON
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min - LIMIT_EPSILON && value <= self.max + LIMIT_EPSILON
    }

    /// Clamp into the range. An empty range collapses to its midpoint.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        if self.is_empty() {
            return (self.min + self.max) / 2.0;
        }
        value.clamp(self.min, self.max)
    }
}

/// Pose of a `width` x `depth` item centered `offset` units along `wall`.
///
/// `back`/`front` offsets are X coordinates, `left`/`right` offsets are Z
/// coordinates. The item is rotated to face into the room, so its depth
/// protrudes from the wall.
#[must_use]
pub fn wall_to_world(wall: Wall, offset: f64, depth: f64, room: &Room, padding: f64) -> WallPose {
    let off_axis = wall.inset(room, depth / 2.0, padding);
    WallPose { position: wall.compose(offset, off_axis), rotation: wall.rotation() }
}

/// Which wall, if any, a footprint rests against.
///
/// The gap between each wall line and the nearest footprint edge is compared
/// to `tolerance`; the closest wall inside the band wins, ties going to the
/// earlier wall in [`Wall::PLACEMENT_ORDER`].
#[must_use]
pub fn classify_wall(footprint: &Aabb, room: &Room, tolerance: f64) -> Option<Wall> {
    let mut best: Option<(Wall, f64)> = None;
    for wall in Wall::PLACEMENT_ORDER {
        let gap = wall_gap(wall, footprint, room);
        if gap >= tolerance {
            continue;
        }
        if best.is_none_or(|(_, d)| gap < d) {
            best = Some((wall, gap));
        }
    }
    best.map(|(wall, _)| wall)
}

/// Absolute distance between a wall line and the footprint edge facing it.
#[must_use]
pub fn wall_gap(wall: Wall, footprint: &Aabb, room: &Room) -> f64 {
    let line = wall.line(room);
    let edge = match wall {
        Wall::Back => footprint.max_z,
        Wall::Front => footprint.min_z,
        Wall::Right => footprint.max_x,
        Wall::Left => footprint.min_x,
    };
    (line - edge).abs()
}

/// Range of centerline offsets along `wall` for an item whose extent along
/// the wall is `width_along_wall`, keeping it clear of both corners.
#[must_use]
pub fn wall_travel_limit(wall: Wall, room: &Room, width_along_wall: f64, padding: f64) -> TravelLimit {
    let limit = wall.half_length(room) - width_along_wall / 2.0 - padding;
    TravelLimit { min: -limit, max: limit }
}
