//! Shared numeric constants for the planner crate.
//!
//! The tuned values here are the defaults behind [`crate::config::Tuning`];
//! callers that need different behavior override the tuning, not these.

// ── Math ────────────────────────────────────────────────────────

/// π / 2 (90°), one cardinal rotation step.
pub const QUARTER_TURN: f64 = std::f64::consts::FRAC_PI_2;

/// Decimal scale used to de-duplicate candidate offsets (3 places).
pub const OFFSET_ROUNDING: f64 = 1000.0;

/// Slack allowed when filtering candidates against travel limits.
pub const LIMIT_EPSILON: f64 = 1e-9;

// ── Walls ───────────────────────────────────────────────────────

/// Inset between a wall-hugging item and the wall line.
pub const WALL_PADDING: f64 = 1.0;

/// Classification band used by the placement solver for items at rest.
pub const REST_WALL_TOLERANCE: f64 = 1.5;

/// Classification band used to capture the wall at drag start.
pub const DRAG_WALL_TOLERANCE: f64 = 30.0;

// ── Placement ───────────────────────────────────────────────────

/// Gap left between an auto-placed item and its neighbour.
pub const PLACEMENT_GAP: f64 = 2.0;

/// Shrink applied to a candidate AABB before collision testing.
pub const PLACEMENT_BUFFER: f64 = 0.002;

/// Margin for "too close" checks.
pub const CLEARANCE_MARGIN: f64 = 5.0;

// ── Drag ────────────────────────────────────────────────────────

/// Cumulative distance from the drag start before snapping arms.
pub const SNAP_MOVE_THRESHOLD: f64 = 10.0;

/// Maximum distance a snap target may pull the item.
pub const SNAP_DISTANCE: f64 = 25.0;

/// Per-frame movement below which a snapped item re-locks.
pub const SNAP_RELOCK_MOVEMENT: f64 = 1.0;

/// Per-frame movement that breaks an active snap.
pub const SNAP_BREAK_MOVEMENT: f64 = 3.0;
