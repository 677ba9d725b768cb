#![allow(clippy::float_cmp)]

use std::f64::consts::PI;

use planner::wall::Wall;

use super::*;

fn replay(raw: &str) -> Report {
    run(parse(raw).unwrap(), Tuning::default()).unwrap()
}

fn item_at(report: &Report, x: f64, z: f64) -> bool {
    report.layout.items().any(|i| i.position.x == x && i.position.z == z)
}

#[test]
fn parse_reads_steps() {
    let script = parse(
        r#"{
            "room": { "width": 600, "depth": 500 },
            "steps": [
                { "op": "add", "model": "sofa", "width": 100, "depth": 80 },
                { "op": "drag", "item": "sofa", "deltas": [[10, 0]] },
                { "op": "remove", "item": "sofa" },
                { "op": "undo" },
                { "op": "redo" },
                { "op": "reset" }
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(script.steps.len(), 6);
    assert!(matches!(&script.steps[1], Step::Drag { cancel: false, .. }));
}

#[test]
fn parse_rejects_degenerate_room() {
    let err = parse(r#"{ "room": { "width": 0, "depth": 500 } }"#).unwrap_err();
    assert!(matches!(err, CliError::Layout(_)));
}

#[test]
fn parse_rejects_unknown_op() {
    let err = parse(r#"{ "room": { "width": 600, "depth": 500 }, "steps": [{ "op": "fly" }] }"#).unwrap_err();
    assert!(matches!(err, CliError::InvalidJson(_)));
}

#[test]
fn adds_fill_back_wall_center_out() {
    let report = replay(
        r#"{
            "room": { "width": 600, "depth": 500 },
            "steps": [
                { "op": "add", "name": "a", "model": "box", "width": 100, "depth": 80 },
                { "op": "add", "name": "b", "model": "box", "width": 100, "depth": 80 },
                { "op": "add", "name": "c", "model": "box", "width": 100, "depth": 80 }
            ]
        }"#,
    );
    assert_eq!(report.layout.len(), 3);
    assert!(item_at(&report, 0.0, 209.0));
    assert!(item_at(&report, 102.0, 209.0));
    assert!(item_at(&report, -102.0, 209.0));
    assert!(report.layout.items().all(|i| i.rotation == PI && i.wall == Some(Wall::Back)));
    assert!(report.can_undo);
    // Neighbours sit 2 apart, inside the 5-unit clearance margin.
    assert_eq!(report.crowded.len(), 2);
}

#[test]
fn drag_then_undo_restores_position() {
    let report = replay(
        r#"{
            "room": { "width": 600, "depth": 500 },
            "steps": [
                { "op": "add", "model": "sofa", "width": 100, "depth": 80 },
                { "op": "drag", "item": "sofa", "deltas": [[10, 0], [10, 0]] },
                { "op": "undo" }
            ]
        }"#,
    );
    assert!(item_at(&report, 0.0, 209.0));
    assert!(report.can_redo);
    assert!(report.steps[1].actions.iter().any(|a| matches!(a, Action::TransformCommitted { .. })));
}

#[test]
fn cancelled_drag_commits_nothing() {
    let report = replay(
        r#"{
            "room": { "width": 600, "depth": 500 },
            "steps": [
                { "op": "add", "model": "sofa", "width": 100, "depth": 80 },
                { "op": "drag", "item": "sofa", "deltas": [[40, 0]], "cancel": true }
            ]
        }"#,
    );
    assert!(item_at(&report, 0.0, 209.0));
    assert!(!report.steps[1].actions.iter().any(|a| matches!(a, Action::TransformCommitted { .. })));
}

#[test]
fn rejected_add_is_reported_and_replay_continues() {
    let report = replay(
        r#"{
            "room": { "width": 100, "depth": 100 },
            "steps": [
                { "op": "add", "name": "bed", "model": "bed", "width": 200, "depth": 200 },
                { "op": "add", "name": "stool", "model": "stool", "width": 20, "depth": 20 }
            ]
        }"#,
    );
    let rejected = report.steps[0].rejected.as_deref().unwrap();
    assert!(rejected.contains("room is full"), "{rejected}");
    assert!(report.steps[1].rejected.is_none());
    assert_eq!(report.layout.len(), 1);
}

#[test]
fn unknown_name_is_an_error() {
    let script = parse(
        r#"{
            "room": { "width": 600, "depth": 500 },
            "steps": [{ "op": "remove", "item": "ghost" }]
        }"#,
    )
    .unwrap();
    let err = run(script, Tuning::default()).unwrap_err();
    assert!(matches!(err, CliError::UnknownName(name) if name == "ghost"));
}

#[test]
fn duplicate_live_name_rejects_only_that_step() {
    let report = replay(
        r#"{
            "room": { "width": 600, "depth": 500 },
            "steps": [
                { "op": "add", "model": "chair", "width": 40, "depth": 40 },
                { "op": "add", "model": "chair", "width": 40, "depth": 40 },
                { "op": "add", "model": "table", "width": 80, "depth": 60 }
            ]
        }"#,
    );
    let rejected = report.steps[1].rejected.as_deref().unwrap();
    assert!(rejected.contains("chair"), "{rejected}");
    assert!(report.steps[2].rejected.is_none());
    assert_eq!(report.layout.len(), 2);
}

#[test]
fn name_is_reusable_after_undo() {
    let report = replay(
        r#"{
            "room": { "width": 600, "depth": 500 },
            "steps": [
                { "op": "add", "model": "sofa", "width": 100, "depth": 80 },
                { "op": "undo" },
                { "op": "add", "model": "sofa", "width": 100, "depth": 80 },
                { "op": "drag", "item": "sofa", "deltas": [[10, 0]] }
            ]
        }"#,
    );
    assert!(report.steps.iter().all(|s| s.rejected.is_none()));
    assert_eq!(report.layout.len(), 1);
    // The drag moved the re-added item, not the undone one.
    assert!(item_at(&report, 10.0, 209.0));
}

#[test]
fn report_serializes_actions_with_type_tags() {
    let report = replay(
        r#"{
            "room": { "width": 600, "depth": 500 },
            "steps": [{ "op": "add", "model": "sofa", "width": 100, "depth": 80 }]
        }"#,
    );
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["steps"][0]["actions"][0]["type"], "item_placed");
    assert_eq!(json["layout"]["room"]["width"], 600.0);
}
