//! Tuning parameters parsed from environment variables.
//!
//! Every threshold the solver and the drag engine use lives here as a named
//! field. The defaults come from [`crate::consts`] and reproduce the tuned
//! behavior; a host can override any of them without touching code.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::consts;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    /// Inset between a wall-hugging item and its wall.
    pub wall_padding: f64,
    /// Gap between an auto-placed item and its neighbour.
    pub placement_gap: f64,
    /// Shrink applied to a candidate footprint before the solver's collision test.
    pub placement_buffer: f64,
    /// Margin for "too close" checks.
    pub clearance_margin: f64,
    /// Wall classification band for items at rest.
    pub rest_wall_tolerance: f64,
    /// Wall classification band at drag start.
    pub drag_wall_tolerance: f64,
    /// Cumulative drag distance before snapping arms.
    pub snap_move_threshold: f64,
    /// Maximum pull distance of a snap target.
    pub snap_distance: f64,
    /// Per-frame movement under which a snapped item re-locks.
    pub snap_relock_movement: f64,
    /// Per-frame movement that breaks a snap.
    pub snap_break_movement: f64,
    /// Cap on undo depth; `None` keeps everything.
    pub history_limit: Option<usize>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            wall_padding: consts::WALL_PADDING,
            placement_gap: consts::PLACEMENT_GAP,
            placement_buffer: consts::PLACEMENT_BUFFER,
            clearance_margin: consts::CLEARANCE_MARGIN,
            rest_wall_tolerance: consts::REST_WALL_TOLERANCE,
            drag_wall_tolerance: consts::DRAG_WALL_TOLERANCE,
            snap_move_threshold: consts::SNAP_MOVE_THRESHOLD,
            snap_distance: consts::SNAP_DISTANCE,
            snap_relock_movement: consts::SNAP_RELOCK_MOVEMENT,
            snap_break_movement: consts::SNAP_BREAK_MOVEMENT,
            history_limit: None,
        }
    }
}

impl Tuning {
    /// Build tuning from `ROOMPLAN_*` environment variables.
    ///
    /// Optional, each falling back to its default:
    /// - `ROOMPLAN_WALL_PADDING`
    /// - `ROOMPLAN_PLACEMENT_GAP`
    /// - `ROOMPLAN_PLACEMENT_BUFFER`
    /// - `ROOMPLAN_CLEARANCE_MARGIN`
    /// - `ROOMPLAN_REST_WALL_TOLERANCE`
    /// - `ROOMPLAN_DRAG_WALL_TOLERANCE`
    /// - `ROOMPLAN_SNAP_MOVE_THRESHOLD`
    /// - `ROOMPLAN_SNAP_DISTANCE`
    /// - `ROOMPLAN_SNAP_RELOCK_MOVEMENT`
    /// - `ROOMPLAN_SNAP_BREAK_MOVEMENT`
    /// - `ROOMPLAN_HISTORY_LIMIT`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a value that does not parse or is
    /// negative / non-finite.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Non-UTF-8 values survive lossily and then fail to parse.
        Self::from_lookup(|key| std::env::var_os(key).map(|v| v.to_string_lossy().into_owned()))
    }

    /// Build tuning from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`Tuning::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        Ok(Self {
            wall_padding: parse_f64(&lookup, "ROOMPLAN_WALL_PADDING", d.wall_padding)?,
            placement_gap: parse_f64(&lookup, "ROOMPLAN_PLACEMENT_GAP", d.placement_gap)?,
            placement_buffer: parse_f64(&lookup, "ROOMPLAN_PLACEMENT_BUFFER", d.placement_buffer)?,
            clearance_margin: parse_f64(&lookup, "ROOMPLAN_CLEARANCE_MARGIN", d.clearance_margin)?,
            rest_wall_tolerance: parse_f64(&lookup, "ROOMPLAN_REST_WALL_TOLERANCE", d.rest_wall_tolerance)?,
            drag_wall_tolerance: parse_f64(&lookup, "ROOMPLAN_DRAG_WALL_TOLERANCE", d.drag_wall_tolerance)?,
            snap_move_threshold: parse_f64(&lookup, "ROOMPLAN_SNAP_MOVE_THRESHOLD", d.snap_move_threshold)?,
            snap_distance: parse_f64(&lookup, "ROOMPLAN_SNAP_DISTANCE", d.snap_distance)?,
            snap_relock_movement: parse_f64(&lookup, "ROOMPLAN_SNAP_RELOCK_MOVEMENT", d.snap_relock_movement)?,
            snap_break_movement: parse_f64(&lookup, "ROOMPLAN_SNAP_BREAK_MOVEMENT", d.snap_break_movement)?,
            history_limit: parse_limit(&lookup, "ROOMPLAN_HISTORY_LIMIT")?,
        })
    }
}

fn parse_f64<F>(lookup: &F, key: &'static str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(ConfigError::Invalid { key, value: raw }),
    }
}

fn parse_limit<F>(lookup: &F, key: &'static str) -> Result<Option<usize>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    match raw.trim().parse::<usize>() {
        Ok(0) => Ok(None),
        Ok(v) => Ok(Some(v)),
        Err(_) => Err(ConfigError::Invalid { key, value: raw }),
    }
}
