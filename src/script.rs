//! Scripted scenarios: replay a room and a list of steps through the engine.
//!
//! A script is JSON:
//!
//! ```json
//! {
//!   "room": { "width": 600, "depth": 500 },
//!   "steps": [
//!     { "op": "add", "name": "sofa", "model": "sofa-3seat", "width": 100, "depth": 80 },
//!     { "op": "drag", "item": "sofa", "deltas": [[10, 0], [10, 0]] },
//!     { "op": "undo" }
//!   ]
//! }
//! ```
//!
//! Items are referred to by the `name` given at `add` (the model id when
//! omitted). A name can be reused once its item has left the layout. A
//! rejected `add` or `remove` is reported on its step and the replay continues.

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use std::collections::HashMap;

use planner::config::Tuning;
use planner::doc::{ItemId, LayoutSnapshot, Room, SceneNode};
use planner::engine::{Action, Engine, NewItem};
use planner::geom::Vec2;
use planner::input::Button;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::CliError;

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    pub room: Room,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Add {
        name: Option<String>,
        model: String,
        width: f64,
        depth: f64,
        #[serde(default)]
        elevation: f64,
        scale: Option<f64>,
    },
    Drag {
        item: String,
        deltas: Vec<[f64; 2]>,
        /// Abort instead of releasing, leaving the item where it started.
        #[serde(default)]
        cancel: bool,
    },
    Remove {
        item: String,
    },
    Undo,
    Redo,
    Reset,
}

#[derive(Debug, Serialize)]
pub struct StepReport {
    pub step: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub steps: Vec<StepReport>,
    pub layout: LayoutSnapshot,
    /// Item pairs closer than the clearance margin.
    pub crowded: Vec<(ItemId, ItemId)>,
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Parse a script from JSON.
///
/// # Errors
///
/// Returns [`CliError::InvalidJson`] for malformed input and
/// [`CliError::Layout`] for a degenerate room.
pub fn parse(raw: &str) -> Result<Script, CliError> {
    let script: Script = serde_json::from_str(raw)?;
    Room::new(script.room.width, script.room.depth)?;
    Ok(script)
}

/// Replay every step and collect what the engine emitted.
///
/// # Errors
///
/// Returns [`CliError::UnknownName`] when a step names an item that was never
/// added. Reusing the name of an item still in the layout only rejects that step.
pub fn run(script: Script, tuning: Tuning) -> Result<Report, CliError> {
    let mut engine = Engine::new(script.room, tuning);
    let mut names: HashMap<String, ItemId> = HashMap::new();
    let mut steps = Vec::with_capacity(script.steps.len());

    for (index, step) in script.steps.into_iter().enumerate() {
        debug!(step = index, ?step, "script: step");
        let outcome = match step {
            Step::Add { name, model, width, depth, elevation, scale } => {
                let name = name.unwrap_or_else(|| model.clone());
                // A name frees up once its item has left the layout (undo, remove).
                let taken = names.get(&name).is_some_and(|id| engine.item(id).is_some());
                if taken {
                    Err(CliError::DuplicateName(name))
                } else {
                    let new = NewItem { model_id: model, width, depth, elevation, scale };
                    engine.add_item(new).map_err(CliError::from).map(|actions| {
                        if let Some(id) = placed_id(&actions) {
                            names.insert(name, id);
                        }
                        actions
                    })
                }
            }
            Step::Drag { item, deltas, cancel } => {
                let id = lookup(&names, &item)?;
                Ok(drag(&mut engine, id, &deltas, cancel))
            }
            Step::Remove { item } => {
                let id = lookup(&names, &item)?;
                engine.remove_item(&id).map_err(CliError::from)
            }
            Step::Undo => Ok(engine.undo()),
            Step::Redo => Ok(engine.redo()),
            Step::Reset => Ok(engine.reset()),
        };

        steps.push(match outcome {
            Ok(actions) => StepReport { step: index, actions, rejected: None },
            Err(e) => StepReport { step: index, actions: Vec::new(), rejected: Some(e.to_string()) },
        });
    }

    info!(steps = steps.len(), items = engine.layout().len(), "script: replay finished");
    Ok(Report {
        steps,
        crowded: engine.crowded_pairs(),
        can_undo: engine.history.can_undo(),
        can_redo: engine.history.can_redo(),
        layout: engine.layout().clone(),
    })
}

fn drag(engine: &mut Engine, id: ItemId, deltas: &[[f64; 2]], cancel: bool) -> Vec<Action> {
    let mut actions = engine.on_pointer_down(SceneNode::Furniture(id), Button::Primary);
    for &[dx, dz] in deltas {
        actions.extend(engine.on_pointer_move(Vec2::new(dx, dz)));
    }
    if cancel {
        actions.extend(engine.cancel_drag());
    } else {
        actions.extend(engine.on_pointer_up());
    }
    actions
}

fn lookup(names: &HashMap<String, ItemId>, name: &str) -> Result<ItemId, CliError> {
    names.get(name).copied().ok_or_else(|| CliError::UnknownName(name.to_owned()))
}

fn placed_id(actions: &[Action]) -> Option<ItemId> {
    actions.iter().find_map(|a| match a {
        Action::ItemPlaced { id, .. } => Some(*id),
        _ => None,
    })
}
