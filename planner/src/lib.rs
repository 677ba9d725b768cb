//! Room layout engine: wall-aware furniture placement, constrained dragging,
//! and undo/redo over whole-layout snapshots.
//!
//! The crate has no rendering or DOM dependency. A host (3D viewer, editor
//! UI, the `roomplan` CLI) reports what the pointer landed on as a
//! [`doc::SceneNode`], feeds pointer deltas in floor-plane units, and applies
//! the [`engine::Action`]s it gets back. The room is centered on the origin;
//! `x` runs left to right and `z` runs front to back.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level [`engine::Engine`]: events in, actions out |
//! | [`doc`] | Room, furniture items, and the layout snapshot |
//! | [`placement`] | Perimeter solver for newly added items |
//! | [`drag`] | Per-frame drag resolution: wall lock, clamping, collision, snap |
//! | [`history`] | Linear undo/redo with a silent commit path |
//! | [`input`] | Mouse buttons and the drag gesture state machine |
//! | [`wall`] | Wall identities, wall-local frames, and travel limits |
//! | [`geom`] | Floor-plane vectors and axis-aligned footprints |
//! | [`config`] | Tunable thresholds, overridable from the environment |
//! | [`consts`] | Default thresholds and numeric constants |

pub mod config;
pub mod consts;
pub mod doc;
pub mod drag;
pub mod engine;
pub mod geom;
pub mod history;
pub mod input;
pub mod placement;
pub mod wall;
