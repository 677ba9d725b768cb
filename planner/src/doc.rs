//! Layout model: the room, furniture items, transforms, and the layout snapshot.
//!
//! This module defines the data that the history manager versions
//! (`LayoutSnapshot`), the per-item placement record (`FurnitureItem`), the
//! persisted per-item representation (`Transform`), a sparse-update type for
//! incremental edits (`PartialTransform`), and the tagged scene node the host
//! reports under the pointer (`SceneNode`).
//!
//! Snapshots flow in from the persistence layer as JSON and flow out the same
//! way; everything in between is plain owned data. Items live in a `BTreeMap`
//! so iteration order, equality, and serialization are deterministic.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geom::{Aabb, Vec2, compute_aabb, overlaps};
use crate::wall::Wall;

/// Unique, stable identifier for a furniture item.
pub type ItemId = Uuid;

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("invalid room size {width} x {depth}")]
    InvalidRoom { width: f64, depth: f64 },
    #[error("invalid footprint {width} x {depth}")]
    InvalidFootprint { width: f64, depth: f64 },
    #[error("unknown item: {0}")]
    UnknownItem(ItemId),
    #[error("item keyed {key} carries id {id}")]
    IdMismatch { key: ItemId, id: ItemId },
    #[error("invalid layout JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Check that a footprint has strictly positive, finite extents.
///
/// # Errors
///
/// Returns [`LayoutError::InvalidFootprint`] otherwise.
pub fn validate_footprint(width: f64, depth: f64) -> Result<(), LayoutError> {
    if width.is_finite() && depth.is_finite() && width > 0.0 && depth > 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidFootprint { width, depth })
    }
}

/// Rectangular room, centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Extent along X.
    pub width: f64,
    /// Extent along Z.
    pub depth: f64,
}

impl Room {
    /// Create a room, rejecting non-positive or non-finite sizes.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidRoom`] for a degenerate room.
    pub fn new(width: f64, depth: f64) -> Result<Self, LayoutError> {
        if width.is_finite() && depth.is_finite() && width > 0.0 && depth > 0.0 {
            Ok(Self { width, depth })
        } else {
            Err(LayoutError::InvalidRoom { width, depth })
        }
    }

    /// Interior of the room as a box.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(Vec2::default(), self.width / 2.0, self.depth / 2.0)
    }
}

/// World position of an item. `y` is the vertical floor-contact coordinate
/// and is carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    /// Projection onto the floor plane.
    #[must_use]
    pub fn floor(&self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }
}

/// Persisted placement of one item, keyed by its model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub model_id: String,
    pub position: Position,
    /// Yaw in radians.
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

/// A placed furniture item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureItem {
    pub id: ItemId,
    pub model_id: String,
    /// Footprint extent along the item's local X (un-rotated).
    pub width: f64,
    /// Footprint extent along the item's local Z (un-rotated).
    pub depth: f64,
    pub position: Position,
    /// Yaw in radians.
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    /// Wall the item was last placed against, if any.
    #[serde(default)]
    pub wall: Option<Wall>,
}

impl FurnitureItem {
    /// A new, not yet placed item at the origin.
    ///
    /// # Panics
    ///
    /// Panics on a non-positive `width` or `depth`.
    #[must_use]
    pub fn new(id: ItemId, model_id: impl Into<String>, width: f64, depth: f64) -> Self {
        assert!(width > 0.0 && depth > 0.0, "invalid footprint {width} x {depth}");
        Self {
            id,
            model_id: model_id.into(),
            width,
            depth,
            position: Position::default(),
            rotation: 0.0,
            scale: None,
            wall: None,
        }
    }

    /// Current position on the floor plane.
    #[must_use]
    pub fn floor_position(&self) -> Vec2 {
        self.position.floor()
    }

    /// World-space footprint at the current position.
    #[must_use]
    pub fn footprint(&self) -> Aabb {
        self.footprint_at(self.floor_position())
    }

    /// Footprint as it would be if the item stood at `center`.
    #[must_use]
    pub fn footprint_at(&self, center: Vec2) -> Aabb {
        compute_aabb(self.width, self.depth, center, self.rotation, 0.0)
    }

    /// Move on the floor plane, keeping `y`.
    pub fn set_floor_position(&mut self, p: Vec2) {
        self.position.x = p.x;
        self.position.z = p.z;
    }

    /// The persisted form of this item's placement.
    #[must_use]
    pub fn transform(&self) -> Transform {
        Transform {
            model_id: self.model_id.clone(),
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
        }
    }
}

/// Non-furniture parts of the scene the pointer may land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralPart {
    Floor,
    Ceiling,
    Wall(Wall),
}

/// What the host reports under the pointer. Resolved once when the scene
/// object is created, so the engine never inspects mesh metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneNode {
    Furniture(ItemId),
    Structural(StructuralPart),
}

/// Sparse update for an item's placement. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialTransform {
    /// New floor position (x, z); `y` is never touched.
    pub floor: Option<Vec2>,
    pub rotation: Option<f64>,
    pub scale: Option<f64>,
    /// `Some(None)` clears the wall, `Some(Some(w))` sets it.
    pub wall: Option<Option<Wall>>,
}

impl PartialTransform {
    /// A full placement write: position, rotation and wall.
    #[must_use]
    pub fn placement(floor: Vec2, rotation: f64, wall: Option<Wall>) -> Self {
        Self { floor: Some(floor), rotation: Some(rotation), scale: None, wall: Some(wall) }
    }
}

/// The full undoable layout: room plus every item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub room: Room,
    #[serde(default)]
    pub items: BTreeMap<ItemId, FurnitureItem>,
}

impl LayoutSnapshot {
    /// An empty room.
    #[must_use]
    pub fn empty(room: Room) -> Self {
        Self { room, items: BTreeMap::new() }
    }

    /// Insert or replace an item.
    pub fn insert(&mut self, item: FurnitureItem) {
        self.items.insert(item.id, item);
    }

    /// Remove an item by id, returning it if it was present.
    pub fn remove(&mut self, id: &ItemId) -> Option<FurnitureItem> {
        self.items.remove(id)
    }

    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&FurnitureItem> {
        self.items.get(id)
    }

    /// Apply a partial update to an existing item. Returns false if the item doesn't exist.
    pub fn apply_partial(&mut self, id: &ItemId, partial: &PartialTransform) -> bool {
        let Some(item) = self.items.get_mut(id) else {
            return false;
        };
        if let Some(p) = partial.floor {
            item.set_floor_position(p);
        }
        if let Some(r) = partial.rotation {
            item.rotation = r;
        }
        if let Some(s) = partial.scale {
            item.scale = Some(s);
        }
        if let Some(w) = partial.wall {
            item.wall = w;
        }
        true
    }

    /// All items in id order.
    pub fn items(&self) -> impl Iterator<Item = &FurnitureItem> {
        self.items.values()
    }

    /// Every item except `id`.
    pub fn others<'a>(&'a self, id: &'a ItemId) -> impl Iterator<Item = &'a FurnitureItem> + 'a {
        self.items.values().filter(move |item| &item.id != id)
    }

    /// Transforms keyed by item id, for the persistence layer.
    #[must_use]
    pub fn transforms(&self) -> BTreeMap<ItemId, Transform> {
        self.items.iter().map(|(id, item)| (*id, item.transform())).collect()
    }

    /// Pairs of items whose footprints overlap with the given margin.
    #[must_use]
    pub fn overlapping_pairs(&self, margin: f64) -> Vec<(ItemId, ItemId)> {
        let items: Vec<(ItemId, Aabb)> = self.items.values().map(|i| (i.id, i.footprint())).collect();
        let mut pairs = Vec::new();
        for (i, (a_id, a)) in items.iter().enumerate() {
            for (b_id, b) in &items[i + 1..] {
                if overlaps(a, b, margin) {
                    pairs.push((*a_id, *b_id));
                }
            }
        }
        pairs
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check the room and every footprint.
    ///
    /// # Errors
    ///
    /// Returns the first invalid room or footprint found.
    pub fn validate(&self) -> Result<(), LayoutError> {
        Room::new(self.room.width, self.room.depth)?;
        for (key, item) in &self.items {
            if *key != item.id {
                return Err(LayoutError::IdMismatch { key: *key, id: item.id });
            }
            validate_footprint(item.width, item.depth)?;
        }
        Ok(())
    }

    /// Serialize for the persistence layer.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, LayoutError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a persisted layout.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Json`] for malformed input, or the validation
    /// error for a degenerate room or footprint.
    pub fn from_json(raw: &str) -> Result<Self, LayoutError> {
        let snapshot: Self = serde_json::from_str(raw)?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}
