//! Undo/redo over element snapshots. Canvas settings are left as they are.

use super::{DesignerError, DesignerState};

impl DesignerState {
    pub(super) fn undo(&mut self) -> Result<(), DesignerError> {
        let current = self.elements.clone();
        let previous = self
            .history
            .undo(current)
            .ok_or(DesignerError::NothingToUndo)?;
        self.elements = previous;
        self.selected_id = None;
        self.touch();
        Ok(())
    }

    pub(super) fn redo(&mut self) -> Result<(), DesignerError> {
        let current = self.elements.clone();
        let next = self
            .history
            .redo(current)
            .ok_or(DesignerError::NothingToRedo)?;
        self.elements = next;
        self.selected_id = None;
        self.touch();
        Ok(())
    }

    /// Drops all undo/redo snapshots.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
