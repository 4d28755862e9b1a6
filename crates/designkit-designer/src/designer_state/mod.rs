//! Designer state: the editable document of one editor session.
//!
//! All mutation goes through [`DesignerState::dispatch`] (or the pure
//! [`reduce`]) with a [`DesignerCommand`]. The state is split into submodules:
//! - `elements`: add, update, delete, select, reorder and duplicate elements
//! - `history`: undo/redo
//! - `file_io`: document payloads and design-file save/load

mod elements;
mod file_io;
mod history;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::canvas::CanvasSettings;
use crate::commands::DesignerCommand;
use crate::document::DesignDocument;
use crate::history::History;
use crate::model::CanvasElement;

/// Reasons an intent did not apply. [`DesignerState::dispatch`] treats all
/// of these as silent no-ops.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DesignerError {
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Element id already in use: {0}")]
    DuplicateId(String),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error("No current document")]
    NoDocument,

    /// A result for a document that is no longer the current one.
    #[error("Document {0} is no longer current")]
    StaleDocument(String),
}

/// What a session starts from. Hosts always provide the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub canvas: CanvasSettings,
    pub history_depth: usize,
}

impl SessionConfig {
    pub fn new(canvas: CanvasSettings, history_depth: usize) -> Self {
        Self {
            canvas,
            history_depth,
        }
    }
}

/// Designer state for one editing session
#[derive(Debug, Clone, PartialEq)]
pub struct DesignerState {
    document: Option<DesignDocument>,
    pub(crate) canvas: CanvasSettings,
    pub(crate) elements: Vec<CanvasElement>,
    pub(crate) selected_id: Option<String>,
    is_preview_mode: bool,
    is_dirty: bool,
    last_saved: Option<DateTime<Utc>>,
    pub(crate) history: History,
    revision: u64,
}

impl DesignerState {
    /// Creates a blank session.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            document: None,
            canvas: config.canvas,
            elements: Vec::new(),
            selected_id: None,
            is_preview_mode: false,
            is_dirty: false,
            last_saved: None,
            history: History::new(config.history_depth),
            revision: 0,
        }
    }

    /// Creates a session hydrated from a persisted document.
    ///
    /// The editor zoom and history depth come from `config`; everything else
    /// comes from the document.
    pub fn from_document(document: DesignDocument, config: SessionConfig) -> Self {
        let mut canvas = document.customizations.canvas.clone();
        canvas.zoom = config.canvas.zoom;
        let elements = document.customizations.elements.clone();
        let last_saved = Some(document.updated_at);

        Self {
            document: Some(document),
            canvas,
            elements,
            selected_id: None,
            is_preview_mode: false,
            is_dirty: false,
            last_saved,
            history: History::new(config.history_depth),
            revision: 0,
        }
    }

    /// Apply an intent. Intents that do not apply (unknown id, empty
    /// history, ...) leave the state untouched and return false.
    pub fn dispatch(&mut self, command: DesignerCommand) -> bool {
        let name = command.name();
        match self.try_apply(command) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("{} ignored: {}", name, e);
                false
            }
        }
    }

    /// Apply an intent, reporting why it did not apply.
    pub fn try_apply(&mut self, command: DesignerCommand) -> Result<(), DesignerError> {
        match command {
            DesignerCommand::AddElement(element) => self.add_element(element),
            DesignerCommand::UpdateElement { id, patch } => self.update_element(&id, &patch),
            DesignerCommand::DeleteElement(id) => self.delete_element(&id),
            DesignerCommand::SelectElement(id) => self.select_element(id),
            DesignerCommand::ReplaceAllElements(elements) => self.replace_all_elements(elements),
            DesignerCommand::UpdateCanvasSettings(patch) => {
                self.canvas.apply_patch(&patch);
                self.touch();
                Ok(())
            }
            DesignerCommand::SetPreviewMode(on) => {
                self.is_preview_mode = on;
                Ok(())
            }
            DesignerCommand::Undo => self.undo(),
            DesignerCommand::Redo => self.redo(),
            DesignerCommand::MarkSaved { at } => {
                self.is_dirty = false;
                self.last_saved = Some(at);
                Ok(())
            }
            DesignerCommand::MarkDirty => {
                self.touch();
                Ok(())
            }
            DesignerCommand::BringToFront(id) => self.bring_to_front(&id),
            DesignerCommand::SendToBack(id) => self.send_to_back(&id),
            DesignerCommand::DuplicateElement { id, new_id, offset } => {
                self.duplicate_element(&id, new_id, offset)
            }
            DesignerCommand::SetDocument(document) => {
                self.document = document.map(|d| *d);
                Ok(())
            }
            DesignerCommand::ApplySaveResult {
                document_id,
                version,
                updated_at,
            } => {
                let document = self.document.as_mut().ok_or(DesignerError::NoDocument)?;
                if document.id != document_id {
                    return Err(DesignerError::StaleDocument(document_id));
                }
                document.version = version;
                document.updated_at = updated_at;
                Ok(())
            }
        }
    }

    /// Marks the working copy as edited.
    pub(crate) fn touch(&mut self) {
        self.is_dirty = true;
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn document(&self) -> Option<&DesignDocument> {
        self.document.as_ref()
    }

    pub fn document_id(&self) -> Option<&str> {
        self.document.as_ref().map(|d| d.id.as_str())
    }

    pub fn document_version(&self) -> Option<u64> {
        self.document.as_ref().map(|d| d.version)
    }

    pub fn canvas(&self) -> &CanvasSettings {
        &self.canvas
    }

    pub fn elements(&self) -> &[CanvasElement] {
        &self.elements
    }

    pub fn element(&self, id: &str) -> Option<&CanvasElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.element(id).is_some()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    /// The selected element, resolved against the current elements.
    pub fn selected_element(&self) -> Option<&CanvasElement> {
        self.selected_id.as_deref().and_then(|id| self.element(id))
    }

    pub fn is_preview_mode(&self) -> bool {
        self.is_preview_mode
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    /// Counter bumped by every edit to the document content.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Get display name for the design.
    pub fn display_name(&self) -> String {
        let name = self
            .document
            .as_ref()
            .map(|d| d.name.as_str())
            .unwrap_or("Untitled");
        if self.is_dirty {
            format!("{}*", name)
        } else {
            name.to_string()
        }
    }
}

/// Pure transition: returns the state after `command`.
pub fn reduce(state: &DesignerState, command: DesignerCommand) -> DesignerState {
    let mut next = state.clone();
    next.dispatch(command);
    next
}
