#![allow(clippy::float_cmp)]

use std::f64::consts::PI;

use super::*;
use crate::doc::StructuralPart;

// =============================================================
// Helpers
// =============================================================

fn engine() -> Engine {
    Engine::new(Room::new(600.0, 500.0).unwrap(), Tuning::default())
}

fn placed_id(actions: &[Action]) -> ItemId {
    actions
        .iter()
        .find_map(|a| match a {
            Action::ItemPlaced { id, .. } => Some(*id),
            _ => None,
        })
        .expect("no ItemPlaced action")
}

fn add(engine: &mut Engine, width: f64, depth: f64) -> ItemId {
    let actions = engine.add_item(NewItem::new("box", width, depth)).unwrap();
    placed_id(&actions)
}

fn drag(engine: &mut Engine, id: ItemId, deltas: &[(f64, f64)]) -> Vec<Action> {
    let mut actions = engine.on_pointer_down(SceneNode::Furniture(id), Button::Primary);
    for &(dx, dz) in deltas {
        actions.extend(engine.on_pointer_move(Vec2::new(dx, dz)));
    }
    actions.extend(engine.on_pointer_up());
    actions
}

fn floor(engine: &Engine, id: ItemId) -> Vec2 {
    engine.item(&id).unwrap().floor_position()
}

// =============================================================
// add_item
// =============================================================

#[test]
fn add_item_places_against_back_wall() {
    let mut e = engine();
    let actions = e.add_item(NewItem::new("sofa", 100.0, 80.0)).unwrap();
    let Some(Action::ItemPlaced { transform, wall, .. }) = actions.first() else {
        panic!("expected ItemPlaced first, got {actions:?}");
    };
    assert_eq!(*wall, Wall::Back);
    assert_eq!(transform.model_id, "sofa");
    assert_eq!(transform.position.x, 0.0);
    assert_eq!(transform.position.z, 209.0);
    assert_eq!(transform.rotation, PI);
    assert!(actions.contains(&Action::HistoryChanged { can_undo: true, can_redo: false }));
}

#[test]
fn add_item_is_one_undo_step() {
    let mut e = engine();
    let id = add(&mut e, 100.0, 80.0);
    assert_eq!(e.history.undo_depth(), 1);

    e.undo();
    assert!(e.layout().is_empty());

    e.redo();
    assert_eq!(floor(&e, id), Vec2::new(0.0, 209.0));
    assert_eq!(e.item(&id).unwrap().wall, Some(Wall::Back));
}

#[test]
fn add_item_keeps_elevation_and_scale() {
    let mut e = engine();
    let mut new = NewItem::new("lamp", 30.0, 30.0);
    new.elevation = 2.5;
    new.scale = Some(1.5);
    let id = placed_id(&e.add_item(new).unwrap());
    let item = e.item(&id).unwrap();
    assert_eq!(item.position.y, 2.5);
    assert_eq!(item.scale, Some(1.5));
}

#[test]
fn second_item_goes_beside_first() {
    let mut e = engine();
    add(&mut e, 100.0, 80.0);
    let second = add(&mut e, 100.0, 80.0);
    assert_eq!(floor(&e, second), Vec2::new(102.0, 209.0));
    assert_eq!(e.history.undo_depth(), 2);
}

#[test]
fn room_full_leaves_history_untouched() {
    let mut e = Engine::new(Room::new(100.0, 100.0).unwrap(), Tuning::default());
    let err = e.add_item(NewItem::new("bed", 200.0, 200.0)).unwrap_err();
    assert!(matches!(err, EngineError::Placement(PlacementError::RoomFull { .. })));
    assert!(e.layout().is_empty());
    assert!(!e.history.can_undo());
}

#[test]
fn invalid_footprint_is_rejected() {
    let mut e = engine();
    let err = e.add_item(NewItem::new("ghost", 0.0, 80.0)).unwrap_err();
    assert!(matches!(err, EngineError::Layout(LayoutError::InvalidFootprint { .. })));
    let err = e.add_item(NewItem::new("ghost", 10.0, f64::NAN)).unwrap_err();
    assert!(matches!(err, EngineError::Layout(LayoutError::InvalidFootprint { .. })));
    assert!(!e.history.can_undo());
}

// =============================================================
// remove_item / set_room
// =============================================================

#[test]
fn remove_item_commits_and_undoes() {
    let mut e = engine();
    let id = add(&mut e, 100.0, 80.0);
    let actions = e.remove_item(&id).unwrap();
    assert!(actions.contains(&Action::ItemRemoved { id }));
    assert!(e.item(&id).is_none());

    e.undo();
    assert_eq!(floor(&e, id), Vec2::new(0.0, 209.0));
}

#[test]
fn remove_unknown_item_errors() {
    let mut e = engine();
    let missing = uuid::Uuid::new_v4();
    let err = e.remove_item(&missing).unwrap_err();
    assert!(matches!(err, EngineError::Layout(LayoutError::UnknownItem(id)) if id == missing));
    assert!(!e.history.can_undo());
}

#[test]
fn set_room_is_undoable() {
    let mut e = engine();
    e.set_room(Room::new(800.0, 700.0).unwrap());
    assert_eq!(e.layout().room.width, 800.0);
    e.undo();
    assert_eq!(e.layout().room.width, 600.0);
}

// =============================================================
// Drag lifecycle
// =============================================================

#[test]
fn drag_commits_one_undo_step() {
    let mut e = engine();
    let id = add(&mut e, 100.0, 80.0);
    let actions = drag(&mut e, id, &[(10.0, 0.0), (10.0, 5.0), (10.0, -5.0)]);

    // Wall-locked: slides along the back wall, depth axis pinned.
    assert_eq!(floor(&e, id), Vec2::new(30.0, 209.0));
    assert_eq!(e.history.undo_depth(), 2);
    assert!(actions.iter().any(|a| matches!(a, Action::TransformCommitted { wall: Some(Wall::Back), .. })));

    e.undo();
    assert_eq!(floor(&e, id), Vec2::new(0.0, 209.0));
    e.redo();
    assert_eq!(floor(&e, id), Vec2::new(30.0, 209.0));
}

#[test]
fn drag_frames_are_written_silently() {
    let mut e = engine();
    let id = add(&mut e, 100.0, 80.0);
    e.on_pointer_down(SceneNode::Furniture(id), Button::Primary);
    let actions = e.on_pointer_move(Vec2::new(15.0, 0.0));
    assert!(actions.contains(&Action::ItemMoved { id, position: Vec2::new(15.0, 209.0), rotation: PI }));
    assert_eq!(floor(&e, id), Vec2::new(15.0, 209.0));
    assert_eq!(e.history.undo_depth(), 1);
    assert_eq!(e.dragging(), Some(id));
}

#[test]
fn drag_without_movement_does_not_commit() {
    let mut e = engine();
    let id = add(&mut e, 100.0, 80.0);
    let actions = drag(&mut e, id, &[(0.0, 0.0)]);
    assert!(!actions.iter().any(|a| matches!(a, Action::TransformCommitted { .. })));
    assert_eq!(e.history.undo_depth(), 1);
    assert!(e.input.is_idle());
}

#[test]
fn drag_collision_reports_feedback_and_holds_position() {
    let mut e = engine();
    let a = add(&mut e, 100.0, 80.0);
    add(&mut e, 100.0, 80.0);

    e.on_pointer_down(SceneNode::Furniture(a), Button::Primary);
    let actions = e.on_pointer_move(Vec2::new(5.0, 0.0));
    assert!(actions.contains(&Action::DragFeedback { id: a, colliding: true, snapped: false }));
    assert_eq!(floor(&e, a), Vec2::new(0.0, 209.0));

    // Released without net movement: nothing to undo beyond the two adds.
    e.on_pointer_up();
    assert_eq!(e.history.undo_depth(), 2);
}

#[test]
fn pointer_down_ignores_structural_nodes() {
    let mut e = engine();
    add(&mut e, 100.0, 80.0);
    for part in [StructuralPart::Floor, StructuralPart::Ceiling, StructuralPart::Wall(Wall::Left)] {
        assert!(e.on_pointer_down(SceneNode::Structural(part), Button::Primary).is_empty());
        assert!(e.input.is_idle());
    }
}

#[test]
fn pointer_down_ignores_secondary_button_and_unknown_ids() {
    let mut e = engine();
    let id = add(&mut e, 100.0, 80.0);
    assert!(e.on_pointer_down(SceneNode::Furniture(id), Button::Secondary).is_empty());
    assert!(e.on_pointer_down(SceneNode::Furniture(uuid::Uuid::new_v4()), Button::Primary).is_empty());
    assert!(e.input.is_idle());
}

#[test]
fn pointer_events_while_idle_are_noops() {
    let mut e = engine();
    assert!(e.on_pointer_move(Vec2::new(5.0, 5.0)).is_empty());
    assert!(e.on_pointer_up().is_empty());
    assert!(e.cancel_drag().is_empty());
}

#[test]
fn cancel_drag_restores_start() {
    let mut e = engine();
    let id = add(&mut e, 100.0, 80.0);
    e.on_pointer_down(SceneNode::Furniture(id), Button::Primary);
    e.on_pointer_move(Vec2::new(40.0, 0.0));
    let actions = e.cancel_drag();
    assert!(actions.contains(&Action::ItemMoved { id, position: Vec2::new(0.0, 209.0), rotation: PI }));
    assert_eq!(floor(&e, id), Vec2::new(0.0, 209.0));
    assert_eq!(e.history.undo_depth(), 1);
    assert!(e.input.is_idle());
}

#[test]
fn undo_mid_drag_cancels_then_steps_back() {
    let mut e = engine();
    add(&mut e, 100.0, 80.0);
    let id = add(&mut e, 100.0, 80.0);
    e.on_pointer_down(SceneNode::Furniture(id), Button::Primary);
    e.on_pointer_move(Vec2::new(20.0, 0.0));
    e.undo();
    assert!(e.input.is_idle());
    assert!(e.item(&id).is_none());
    e.redo();
    assert_eq!(floor(&e, id), Vec2::new(102.0, 209.0));
}

#[test]
fn new_commit_after_undo_clears_redo() {
    let mut e = engine();
    let id = add(&mut e, 100.0, 80.0);
    drag(&mut e, id, &[(20.0, 0.0)]);
    e.undo();
    assert!(e.history.can_redo());
    add(&mut e, 50.0, 50.0);
    assert!(!e.history.can_redo());
    assert!(e.redo().is_empty());
}

// =============================================================
// reset / persistence
// =============================================================

#[test]
fn reset_returns_to_empty_room() {
    let mut e = engine();
    add(&mut e, 100.0, 80.0);
    add(&mut e, 100.0, 80.0);
    let actions = e.reset();
    assert!(actions.contains(&Action::HistoryChanged { can_undo: false, can_redo: false }));
    assert!(e.layout().is_empty());
}

#[test]
fn save_and_load_round_trip() {
    let mut e = engine();
    let id = add(&mut e, 100.0, 80.0);
    let saved = e.save_snapshot().unwrap();

    let mut other = Engine::new(Room::new(10.0, 10.0).unwrap(), Tuning::default());
    other.load_snapshot(&saved).unwrap();
    assert_eq!(other.layout(), e.layout());
    assert!(!other.history.can_undo());

    // The loaded layout is the new reset target.
    other.remove_item(&id).unwrap();
    other.reset();
    assert_eq!(floor(&other, id), Vec2::new(0.0, 209.0));
}

#[test]
fn load_invalid_snapshot_leaves_engine_unchanged() {
    let mut e = engine();
    let id = add(&mut e, 100.0, 80.0);
    assert!(e.load_snapshot("{ not json").is_err());
    assert!(e.item(&id).is_some());
    assert_eq!(e.history.undo_depth(), 1);
}

#[test]
fn crowded_pairs_uses_clearance_margin() {
    let mut e = engine();
    let a = add(&mut e, 100.0, 80.0);
    let b = add(&mut e, 100.0, 80.0);
    let pairs = e.crowded_pairs();
    assert_eq!(pairs.len(), 1);
    let (p, q) = pairs[0];
    assert!((p == a && q == b) || (p == b && q == a));
}

#[test]
fn actions_serialize_with_type_tag() {
    let json = serde_json::to_value(Action::HistoryChanged { can_undo: true, can_redo: false }).unwrap();
    assert_eq!(json["type"], "history_changed");
    assert_eq!(json["can_undo"], true);
}
