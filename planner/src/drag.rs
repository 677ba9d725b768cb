//! Drag constraint engine: turns pointer deltas into legal, optionally snapped positions.
//!
//! DESIGN
//! ======
//! A `DragGesture` is created on pointer-down and carries everything the
//! per-frame resolver needs: the wall captured at drag start, the start and
//! last resolved positions, and the snap/collision flags. Each frame:
//!
//! 1. apply the delta;
//! 2. constrain it (onto the captured wall's inset line, or inside the room);
//! 3. revert the whole frame if the result collides with any other item;
//! 4. arm snapping once the item has travelled far enough from the start;
//! 5. pull onto the nearest adjacent-placement slot within snap distance when
//!    not yet snapped or when barely moving;
//! 6. break an existing snap when the frame moved fast enough, or once no
//!    slot is within snap distance.
//!
//! Nothing here mutates the layout. The engine decides what to commit.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use tracing::debug;

use crate::config::Tuning;
use crate::doc::{FurnitureItem, ItemId, LayoutSnapshot, Room};
use crate::geom::{Aabb, Vec2, overlaps};
use crate::wall::{TravelLimit, Wall, classify_wall, wall_travel_limit};

/// Resolved output of one drag frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragFrame {
    pub position: Vec2,
    pub rotation: f64,
    /// The proposed move was rejected because it collided.
    pub colliding: bool,
    /// The item is magnet-locked to a neighbour.
    pub snapped: bool,
}

/// Per-gesture state, captured at drag start.
#[derive(Debug, Clone, PartialEq)]
pub struct DragGesture {
    /// Item being dragged.
    pub id: ItemId,
    /// Wall the item is locked to for the whole gesture, if any.
    pub wall: Option<Wall>,
    /// Floor position at drag start.
    pub start: Vec2,
    /// Wall recorded on the item at drag start, restored on cancel.
    pub start_wall: Option<Wall>,
    /// Last resolved position; the base for the next delta.
    pub last: Vec2,
    /// Rotation of the item during the gesture.
    pub rotation: f64,
    /// Cumulative displacement has crossed the snap threshold.
    pub moved_enough: bool,
    pub snapped: bool,
    pub colliding: bool,
}

impl DragGesture {
    /// Start a gesture for `item`, capturing its wall (if any) within the drag tolerance.
    #[must_use]
    pub fn begin(item: &FurnitureItem, room: &Room, tuning: &Tuning) -> Self {
        let wall = classify_wall(&item.footprint(), room, tuning.drag_wall_tolerance);
        let start = item.floor_position();
        debug!(id = %item.id, wall = ?wall, x = start.x, z = start.z, "drag: begin");
        Self {
            id: item.id,
            wall,
            start,
            start_wall: item.wall,
            last: start,
            rotation: item.rotation,
            moved_enough: false,
            snapped: false,
            colliding: false,
        }
    }

    /// Current state as a frame, without moving.
    #[must_use]
    pub fn frame(&self) -> DragFrame {
        DragFrame { position: self.last, rotation: self.rotation, colliding: self.colliding, snapped: self.snapped }
    }

    /// Resolve one pointer delta against the rest of `layout`.
    ///
    /// `item` supplies the footprint; its stored position is ignored in
    /// favor of the gesture's last resolved position.
    pub fn resolve(&mut self, delta: Vec2, item: &FurnitureItem, layout: &LayoutSnapshot, tuning: &Tuning) -> DragFrame {
        if delta.is_zero() {
            return self.frame();
        }

        let room = &layout.room;
        let others: Vec<Aabb> = layout.others(&self.id).map(FurnitureItem::footprint).collect();
        let candidate = self.constrain(self.last + delta, item, room, tuning);

        if collides(&item.footprint_at(candidate), &others) {
            debug!(id = %self.id, x = candidate.x, z = candidate.z, "drag: collision, reverting frame");
            self.colliding = true;
            self.snapped = false;
            return self.frame();
        }
        self.colliding = false;

        if !self.moved_enough && candidate.distance(self.start) > tuning.snap_move_threshold {
            self.moved_enough = true;
        }

        let movement = delta.length();
        let was_snapped = self.snapped;
        let mut position = candidate;

        if self.moved_enough {
            match self.snap_target(candidate, item, room, &others, tuning) {
                Some(target) if !was_snapped || movement < tuning.snap_relock_movement => {
                    position = target;
                    self.snapped = true;
                }
                Some(_) => {}
                // Drifted out of range of every slot.
                None => self.snapped = false,
            }
            if was_snapped && movement > tuning.snap_break_movement {
                debug!(id = %self.id, movement, "drag: snap released");
                self.snapped = false;
            }
        }

        self.last = position;
        self.frame()
    }

    /// Apply the wall lock or the room bounds to a proposed position.
    #[must_use]
    pub fn constrain(&self, proposed: Vec2, item: &FurnitureItem, room: &Room, tuning: &Tuning) -> Vec2 {
        let fp = item.footprint_at(proposed);
        let pad = tuning.wall_padding;
        match self.wall {
            Some(wall) => {
                let (along_half, protrude_half) = wall.split_extents(&fp);
                let limit = wall_travel_limit(wall, room, along_half * 2.0, pad);
                wall.compose(limit.clamp(wall.along(proposed)), wall.inset(room, protrude_half, pad))
            }
            None => {
                // Free items clamp on both axes, which covers whichever wall is nearest.
                let x = axis_limit(room.width, fp.half_x(), pad).clamp(proposed.x);
                let z = axis_limit(room.depth, fp.half_z(), pad).clamp(proposed.z);
                Vec2::new(x, z)
            }
        }
    }

    /// Nearest adjacent-placement slot within snap distance, if any.
    fn snap_target(&self, candidate: Vec2, item: &FurnitureItem, room: &Room, others: &[Aabb], tuning: &Tuning) -> Option<Vec2> {
        let fp = item.footprint_at(candidate);
        let gap = tuning.placement_gap;
        let snap_x = self.wall.is_none_or(Wall::runs_along_x);
        let snap_z = self.wall.is_none_or(|w| !w.runs_along_x());

        let mut options = Vec::new();
        for other in others {
            if snap_x && spans_overlap(fp.min_z, fp.max_z, other.min_z, other.max_z) {
                options.push(Vec2::new(other.max_x + gap + fp.half_x(), candidate.z));
                options.push(Vec2::new(other.min_x - gap - fp.half_x(), candidate.z));
            }
            if snap_z && spans_overlap(fp.min_x, fp.max_x, other.min_x, other.max_x) {
                options.push(Vec2::new(candidate.x, other.max_z + gap + fp.half_z()));
                options.push(Vec2::new(candidate.x, other.min_z - gap - fp.half_z()));
            }
        }

        options
            .into_iter()
            .map(|p| (p.distance(candidate), p))
            .filter(|(d, _)| *d <= tuning.snap_distance)
            .filter(|(_, p)| self.constrain(*p, item, room, tuning).distance(*p) < 1e-9)
            .filter(|(_, p)| !collides(&item.footprint_at(*p), others))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, p)| p)
    }
}

fn axis_limit(room_extent: f64, half: f64, pad: f64) -> TravelLimit {
    let limit = room_extent / 2.0 - half - pad;
    TravelLimit { min: -limit, max: limit }
}

fn spans_overlap(a_min: f64, a_max: f64, b_min: f64, b_max: f64) -> bool {
    a_min < b_max && a_max > b_min
}

fn collides(fp: &Aabb, others: &[Aabb]) -> bool {
    others.iter().any(|other| overlaps(fp, other, 0.0))
}
