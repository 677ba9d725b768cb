//! Linear undo/redo history over whole-layout snapshots.
//!
//! DESIGN
//! ======
//! `History` keeps `past`, `present` and `future`. A commit pushes the old
//! present onto `past` and drops the redo branch; there is no redo tree.
//! `commit_silent` edits `present` in place without creating a checkpoint,
//! which lets the engine fold automatic corrections and in-flight drag frames
//! into the single undo step of the user gesture that caused them.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use tracing::debug;

#[derive(Debug, Clone)]
pub struct History<T> {
    past: Vec<T>,
    present: T,
    /// Next redo target is the last element.
    future: Vec<T>,
    initial: T,
    limit: Option<usize>,
}

impl<T: Clone> History<T> {
    /// Start with `initial` as the present and nothing to undo.
    #[must_use]
    pub fn new(initial: T, limit: Option<usize>) -> Self {
        Self { past: Vec::new(), present: initial.clone(), future: Vec::new(), initial, limit }
    }

    #[must_use]
    pub fn present(&self) -> &T {
        &self.present
    }

    /// Record `snapshot` as a new undoable step.
    pub fn commit(&mut self, snapshot: T) {
        let previous = std::mem::replace(&mut self.present, snapshot);
        self.past.push(previous);
        self.future.clear();
        if let Some(limit) = self.limit {
            if self.past.len() > limit {
                let excess = self.past.len() - limit;
                self.past.drain(..excess);
            }
        }
        debug!(undo = self.past.len(), "history: commit");
    }

    /// Mutate `present` in place without creating an undo step.
    pub fn commit_silent<R>(&mut self, update: impl FnOnce(&mut T) -> R) -> R {
        update(&mut self.present)
    }

    /// Step back. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push(current);
        debug!(undo = self.past.len(), redo = self.future.len(), "history: undo");
        true
    }

    /// Step forward. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push(current);
        debug!(undo = self.past.len(), redo = self.future.len(), "history: redo");
        true
    }

    /// Drop all history and return to the initial snapshot.
    pub fn reset(&mut self) {
        self.past.clear();
        self.future.clear();
        self.present = self.initial.clone();
        debug!("history: reset");
    }

    /// Drop all history and make `snapshot` both the present and the reset target.
    pub fn reset_to(&mut self, snapshot: T) {
        self.initial = snapshot;
        self.reset();
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }
}
