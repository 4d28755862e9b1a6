//! Undo/redo history of whole element-array snapshots.
//!
//! `past` holds the arrays that existed before each structural change, oldest
//! first. `future` holds arrays that were undone, most recently undone last.
//! Canvas settings are not part of a snapshot.

use serde::{Deserialize, Serialize};

use crate::model::CanvasElement;

/// A full copy of the element array at one point in time.
pub type ElementSnapshot = Vec<CanvasElement>;

/// Default number of snapshots kept on the undo side.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Bounded undo/redo stacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    past: Vec<ElementSnapshot>,
    future: Vec<ElementSnapshot>,
    max_depth: usize,
}

impl History {
    /// Creates an empty history keeping at most `max_depth` undo snapshots.
    /// A depth of zero is treated as one.
    pub fn new(max_depth: usize) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Records the array as it was before a structural change. Clears redo.
    pub fn record(&mut self, before: ElementSnapshot) {
        self.future.clear();
        self.past.push(before);

        // Trim oldest when over depth
        if self.past.len() > self.max_depth {
            let excess = self.past.len() - self.max_depth;
            self.past.drain(..excess);
            tracing::debug!("History trimmed by {} snapshot(s)", excess);
        }
    }

    /// Pops the most recent past snapshot, parking `current` on the redo side.
    pub fn undo(&mut self, current: ElementSnapshot) -> Option<ElementSnapshot> {
        let previous = self.past.pop()?;
        self.future.push(current);
        Some(previous)
    }

    /// Inverse of [`History::undo`].
    pub fn redo(&mut self, current: ElementSnapshot) -> Option<ElementSnapshot> {
        let next = self.future.pop()?;
        self.past.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn past(&self) -> &[ElementSnapshot] {
        &self.past
    }

    pub fn future(&self) -> &[ElementSnapshot] {
        &self.future
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}
