//! Input model: mouse buttons and the drag gesture state machine.
//!
//! `InputState` is the active gesture being tracked between pointer-down and
//! pointer-up. The engine drives it with discrete events:
//!
//! ```text
//! Idle --pointer-down on furniture--> Dragging --pointer-up / cancel--> Idle
//! ```

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::drag::DragGesture;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is moving a furniture item.
    Dragging(DragGesture),
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The active drag gesture, if any.
    #[must_use]
    pub fn gesture(&self) -> Option<&DragGesture> {
        match self {
            Self::Dragging(g) => Some(g),
            Self::Idle => None,
        }
    }
}
