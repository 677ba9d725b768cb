//! Layout engine: owns the history and the drag state machine, returns actions to the host.
//!
//! The host (renderer, UI, CLI) feeds discrete events in and applies the
//! returned [`Action`]s to whatever it draws. The engine is the single point
//! of mutation for the layout; the placement solver and the drag resolver
//! only compute candidates.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Tuning;
use crate::doc::{
    FurnitureItem, ItemId, LayoutError, LayoutSnapshot, PartialTransform, Room, SceneNode, Transform, validate_footprint,
};
use crate::drag::DragGesture;
use crate::geom::Vec2;
use crate::history::History;
use crate::input::{Button, InputState};
use crate::placement::{PlacementError, place_item};
use crate::wall::Wall;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Placement(#[from] PlacementError),
}

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// A new item was auto-placed against a wall.
    ItemPlaced { id: ItemId, transform: Transform, wall: Wall },
    ItemRemoved { id: ItemId },
    /// Per-frame drag position.
    ItemMoved { id: ItemId, position: Vec2, rotation: f64 },
    /// Indicator state for the dragged item.
    DragFeedback { id: ItemId, colliding: bool, snapped: bool },
    /// Final transform of a drag, recorded as one undo step.
    TransformCommitted { id: ItemId, transform: Transform, wall: Option<Wall> },
    /// The whole layout changed (undo, redo, reset, load, room change).
    LayoutReplaced,
    HistoryChanged { can_undo: bool, can_redo: bool },
    RenderNeeded,
}

/// Request to add a furniture item.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub model_id: String,
    pub width: f64,
    pub depth: f64,
    /// Vertical floor-contact coordinate, carried through untouched.
    pub elevation: f64,
    pub scale: Option<f64>,
}

impl NewItem {
    #[must_use]
    pub fn new(model_id: impl Into<String>, width: f64, depth: f64) -> Self {
        Self { model_id: model_id.into(), width, depth, elevation: 0.0, scale: None }
    }
}

/// Engine state: the versioned layout, tuning, and the active gesture.
pub struct Engine {
    pub history: History<LayoutSnapshot>,
    pub tuning: Tuning,
    pub input: InputState,
}

impl Engine {
    /// An engine over an empty `room`.
    #[must_use]
    pub fn new(room: Room, tuning: Tuning) -> Self {
        Self { history: History::new(LayoutSnapshot::empty(room), tuning.history_limit), tuning, input: InputState::Idle }
    }

    // --- Queries ---

    /// The canonical current layout.
    #[must_use]
    pub fn layout(&self) -> &LayoutSnapshot {
        self.history.present()
    }

    /// Look up an item by id.
    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&FurnitureItem> {
        self.layout().get(id)
    }

    /// Id of the item being dragged, if any.
    #[must_use]
    pub fn dragging(&self) -> Option<ItemId> {
        self.input.gesture().map(|g| g.id)
    }

    /// Pairs of items closer than the clearance margin.
    #[must_use]
    pub fn crowded_pairs(&self) -> Vec<(ItemId, ItemId)> {
        self.layout().overlapping_pairs(self.tuning.clearance_margin)
    }

    // --- Layout mutations ---

    /// Auto-place a new item. The insertion is one undo step; the solved
    /// transform is written back silently so it does not add a second.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidFootprint`] for bad dimensions and
    /// [`PlacementError::RoomFull`] when no slot exists. History is untouched
    /// in both cases and the item must be discarded.
    pub fn add_item(&mut self, new: NewItem) -> Result<Vec<Action>, EngineError> {
        validate_footprint(new.width, new.depth)?;
        let mut actions = self.cancel_drag();

        let placement = place_item(new.width, new.depth, self.layout(), &self.tuning).inspect_err(|e| {
            warn!(model = %new.model_id, error = %e, "engine: item rejected");
        })?;

        let mut item = FurnitureItem::new(Uuid::new_v4(), new.model_id, new.width, new.depth);
        item.position.y = new.elevation;
        item.scale = new.scale;
        let id = item.id;

        let mut next = self.layout().clone();
        next.insert(item);
        self.history.commit(next);
        self.history.commit_silent(|layout| {
            layout.apply_partial(&id, &PartialTransform::placement(placement.position, placement.rotation, Some(placement.wall)))
        });

        let transform = self.item(&id).map(FurnitureItem::transform).ok_or(LayoutError::UnknownItem(id))?;
        info!(%id, wall = %placement.wall, x = placement.position.x, z = placement.position.z, "engine: item added");
        actions.push(Action::ItemPlaced { id, transform, wall: placement.wall });
        actions.push(self.history_changed());
        actions.push(Action::RenderNeeded);
        Ok(actions)
    }

    /// Remove an item as one undo step.
    ///
    /// # Errors
    ///
    /// [`LayoutError::UnknownItem`] if the id is not in the layout.
    pub fn remove_item(&mut self, id: &ItemId) -> Result<Vec<Action>, EngineError> {
        if self.item(id).is_none() {
            return Err(LayoutError::UnknownItem(*id).into());
        }
        let mut actions = self.cancel_drag();
        let mut next = self.layout().clone();
        next.remove(id);
        self.history.commit(next);
        info!(%id, "engine: item removed");
        actions.push(Action::ItemRemoved { id: *id });
        actions.push(self.history_changed());
        actions.push(Action::RenderNeeded);
        Ok(actions)
    }

    /// Change the room size as one undo step. Items keep their positions.
    pub fn set_room(&mut self, room: Room) -> Vec<Action> {
        let mut actions = self.cancel_drag();
        let mut next = self.layout().clone();
        next.room = room;
        self.history.commit(next);
        actions.push(Action::LayoutReplaced);
        actions.push(self.history_changed());
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Input events ---

    /// Begin a drag if the primary button lands on a furniture item.
    pub fn on_pointer_down(&mut self, node: SceneNode, button: Button) -> Vec<Action> {
        if !self.input.is_idle() || button != Button::Primary {
            return Vec::new();
        }
        let SceneNode::Furniture(id) = node else {
            return Vec::new();
        };
        let Some(item) = self.item(&id) else {
            return Vec::new();
        };
        let gesture = DragGesture::begin(item, &self.layout().room, &self.tuning);
        let feedback = Action::DragFeedback { id, colliding: false, snapped: false };
        self.input = InputState::Dragging(gesture);
        vec![feedback, Action::RenderNeeded]
    }

    /// Resolve one drag frame and write it silently into the present layout.
    pub fn on_pointer_move(&mut self, delta: Vec2) -> Vec<Action> {
        let InputState::Dragging(gesture) = &mut self.input else {
            return Vec::new();
        };
        let id = gesture.id;
        let Some(item) = self.history.present().get(&id).cloned() else {
            self.input = InputState::Idle;
            return Vec::new();
        };

        let frame = gesture.resolve(delta, &item, self.history.present(), &self.tuning);
        self.history.commit_silent(|layout| {
            layout.apply_partial(&id, &PartialTransform { floor: Some(frame.position), ..Default::default() })
        });

        vec![
            Action::ItemMoved { id, position: frame.position, rotation: frame.rotation },
            Action::DragFeedback { id, colliding: frame.colliding, snapped: frame.snapped },
            Action::RenderNeeded,
        ]
    }

    /// End the gesture, committing the final transform as a single undo step.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        let InputState::Dragging(gesture) = std::mem::take(&mut self.input) else {
            return Vec::new();
        };
        let id = gesture.id;
        let mut actions = vec![Action::DragFeedback { id, colliding: false, snapped: false }];

        let Some(item) = self.item(&id).cloned() else {
            return actions;
        };
        if item.floor_position() == gesture.start {
            actions.push(Action::RenderNeeded);
            return actions;
        }

        // Fold the silent frames into one step whose "before" is the drag start.
        let mut done = self.layout().clone();
        done.apply_partial(&id, &PartialTransform { wall: Some(gesture.wall), ..Default::default() });
        self.history.commit_silent(|layout| {
            layout.apply_partial(
                &id,
                &PartialTransform { floor: Some(gesture.start), wall: Some(gesture.start_wall), ..Default::default() },
            )
        });
        self.history.commit(done);

        if let Some(item) = self.item(&id) {
            info!(%id, x = item.position.x, z = item.position.z, "engine: drag committed");
            actions.push(Action::TransformCommitted { id, transform: item.transform(), wall: item.wall });
        }
        actions.push(self.history_changed());
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Abort the gesture and put the item back where it started.
    pub fn cancel_drag(&mut self) -> Vec<Action> {
        let InputState::Dragging(gesture) = std::mem::take(&mut self.input) else {
            return Vec::new();
        };
        let id = gesture.id;
        let restored = self.history.commit_silent(|layout| {
            layout.apply_partial(&id, &PartialTransform { floor: Some(gesture.start), ..Default::default() })
        });
        if !restored {
            return Vec::new();
        }
        vec![
            Action::ItemMoved { id, position: gesture.start, rotation: gesture.rotation },
            Action::DragFeedback { id, colliding: false, snapped: false },
            Action::RenderNeeded,
        ]
    }

    // --- History ---

    /// Step back one undoable change. No-op when there is nothing to undo.
    pub fn undo(&mut self) -> Vec<Action> {
        let mut actions = self.cancel_drag();
        if self.history.undo() {
            actions.push(Action::LayoutReplaced);
            actions.push(self.history_changed());
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Step forward one undone change. No-op when there is nothing to redo.
    pub fn redo(&mut self) -> Vec<Action> {
        let mut actions = self.cancel_drag();
        if self.history.redo() {
            actions.push(Action::LayoutReplaced);
            actions.push(self.history_changed());
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Clear history back to the initial layout.
    pub fn reset(&mut self) -> Vec<Action> {
        self.input = InputState::Idle;
        self.history.reset();
        vec![Action::LayoutReplaced, self.history_changed(), Action::RenderNeeded]
    }

    // --- Persistence boundary ---

    /// Replace everything with a persisted layout; it also becomes the reset target.
    ///
    /// # Errors
    ///
    /// Returns the parse or validation error; the engine is unchanged then.
    pub fn load_snapshot(&mut self, raw: &str) -> Result<Vec<Action>, EngineError> {
        let snapshot = LayoutSnapshot::from_json(raw)?;
        self.input = InputState::Idle;
        info!(items = snapshot.len(), "engine: layout loaded");
        self.history.reset_to(snapshot);
        Ok(vec![Action::LayoutReplaced, self.history_changed(), Action::RenderNeeded])
    }

    /// Serialize the present layout.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Json`] if serialization fails.
    pub fn save_snapshot(&self) -> Result<String, EngineError> {
        Ok(self.layout().to_json()?)
    }

    fn history_changed(&self) -> Action {
        Action::HistoryChanged { can_undo: self.history.can_undo(), can_redo: self.history.can_redo() }
    }
}
