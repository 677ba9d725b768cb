//! Perimeter placement solver: finds a free wall slot for a new item.
//!
//! DESIGN
//! ======
//! Walls are tried in a fixed order (`back`, `right`, `front`, `left`). On
//! each wall the solver builds a short list of centerline offsets: the two
//! slots flanking every item already resting on that wall, both wall ends,
//! and (on `back` only) the room center. Candidates are clamped to the wall's
//! travel range, de-duplicated at three decimals, and ordered by a per-wall
//! fill policy so the room fills contiguously: `back` center-outward, `right`
//! and `front` descending, `left` ascending. The first candidate whose
//! footprint clears every existing item wins.
//!
//! Work is bounded by `4 * (2n + 3)` candidate evaluations for `n` items.

#[cfg(test)]
#[path = "placement_test.rs"]
mod placement_test;

use std::cmp::Ordering;

use tracing::{debug, info, warn};

use crate::config::Tuning;
use crate::consts::OFFSET_ROUNDING;
use crate::doc::{LayoutSnapshot, Room};
use crate::geom::{Aabb, Vec2, compute_aabb, overlaps};
use crate::wall::{TravelLimit, Wall, wall_gap, wall_to_world, wall_travel_limit};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlacementError {
    #[error("room is full: no free wall slot for a {width} x {depth} item")]
    RoomFull { width: f64, depth: f64 },
}

/// A legal slot chosen by the solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec2,
    pub rotation: f64,
    pub wall: Wall,
}

/// Find a collision-free wall slot for a `width` x `depth` item in `layout`.
///
/// # Errors
///
/// Returns [`PlacementError::RoomFull`] when no wall has a legal slot. The
/// caller must then discard the item; nothing has been mutated.
///
/// # Panics
///
/// Panics on a non-positive `width` or `depth`.
pub fn place_item(width: f64, depth: f64, layout: &LayoutSnapshot, tuning: &Tuning) -> Result<Placement, PlacementError> {
    let room = &layout.room;
    let existing: Vec<Aabb> = layout.items().map(crate::doc::FurnitureItem::footprint).collect();

    for wall in Wall::PLACEMENT_ORDER {
        let limit = wall_travel_limit(wall, room, width, tuning.wall_padding);
        if limit.is_empty() {
            debug!(%wall, width, "placement: item wider than wall");
            continue;
        }

        let candidates = wall_candidates(wall, width, &limit, &existing, room, tuning);
        debug!(%wall, count = candidates.len(), "placement: trying wall");

        for offset in candidates {
            let pose = wall_to_world(wall, offset, depth, room, tuning.wall_padding);
            let footprint = compute_aabb(width, depth, pose.position, pose.rotation, -tuning.placement_buffer);
            if !contains(&room.bounds(), &footprint) {
                continue;
            }
            if existing.iter().any(|other| overlaps(&footprint, other, 0.0)) {
                continue;
            }
            info!(%wall, offset, x = pose.position.x, z = pose.position.z, "placement: slot found");
            return Ok(Placement { position: pose.position, rotation: pose.rotation, wall });
        }
    }

    warn!(width, depth, items = existing.len(), "placement: room full");
    Err(PlacementError::RoomFull { width, depth })
}

/// Ordered centerline offsets to try on `wall` for an item `width` wide.
#[must_use]
pub fn wall_candidates(
    wall: Wall,
    width: f64,
    limit: &TravelLimit,
    existing: &[Aabb],
    room: &Room,
    tuning: &Tuning,
) -> Vec<f64> {
    let half = width / 2.0;
    let gap = tuning.placement_gap;

    let mut raw = vec![limit.min, limit.max];
    if wall == Wall::Back {
        raw.push(0.0);
    }
    for neighbour in existing.iter().filter(|fp| wall_gap(wall, fp, room) < tuning.rest_wall_tolerance) {
        let (lo, hi) = along_range(wall, neighbour);
        raw.push(lo - gap - half);
        raw.push(hi + gap + half);
    }

    let mut candidates: Vec<f64> = raw
        .into_iter()
        .filter(|v| limit.contains(*v))
        .map(|v| limit.clamp((v * OFFSET_ROUNDING).round() / OFFSET_ROUNDING))
        .collect();
    candidates.sort_by(f64::total_cmp);
    candidates.dedup();

    match wall {
        Wall::Back => candidates.sort_by(center_out),
        Wall::Right | Wall::Front => candidates.sort_by(|a, b| b.total_cmp(a)),
        Wall::Left => {}
    }
    candidates
}

/// Order by distance from zero; on ties the positive side goes first.
fn center_out(a: &f64, b: &f64) -> Ordering {
    a.abs().total_cmp(&b.abs()).then_with(|| b.total_cmp(a))
}

fn along_range(wall: Wall, fp: &Aabb) -> (f64, f64) {
    if wall.runs_along_x() { (fp.min_x, fp.max_x) } else { (fp.min_z, fp.max_z) }
}

fn contains(outer: &Aabb, inner: &Aabb) -> bool {
    inner.min_x >= outer.min_x && inner.max_x <= outer.max_x && inner.min_z >= outer.min_z && inner.max_z <= outer.max_z
}
