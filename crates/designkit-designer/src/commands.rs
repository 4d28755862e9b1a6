use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::canvas::CanvasSettingsPatch;
use crate::document::DesignDocument;
use crate::model::{CanvasElement, ElementPatch};

/// An intent dispatched to the designer state.
///
/// Every state change goes through one of these, applied in dispatch order.
/// Structural intents (add, delete, replace, reorder, duplicate) record a
/// history snapshot; the rest do not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::large_enum_variant)]
pub enum DesignerCommand {
    AddElement(CanvasElement),
    UpdateElement { id: String, patch: ElementPatch },
    DeleteElement(String),
    SelectElement(Option<String>),
    ReplaceAllElements(Vec<CanvasElement>),
    UpdateCanvasSettings(CanvasSettingsPatch),
    SetPreviewMode(bool),
    Undo,
    Redo,
    MarkSaved { at: DateTime<Utc> },
    MarkDirty,
    BringToFront(String),
    SendToBack(String),
    DuplicateElement {
        id: String,
        new_id: String,
        offset: (f64, f64),
    },
    /// Attach (or detach) the persisted document after create or load.
    SetDocument(Option<Box<DesignDocument>>),
    /// Copy the collaborator-assigned version back after a save. Rejected
    /// unless `document_id` is still the current document.
    ApplySaveResult {
        document_id: String,
        version: u64,
        updated_at: DateTime<Utc>,
    },
}

impl DesignerCommand {
    pub fn update(id: impl Into<String>, patch: ElementPatch) -> Self {
        DesignerCommand::UpdateElement {
            id: id.into(),
            patch,
        }
    }

    pub fn delete(id: impl Into<String>) -> Self {
        DesignerCommand::DeleteElement(id.into())
    }

    pub fn select(id: impl Into<String>) -> Self {
        DesignerCommand::SelectElement(Some(id.into()))
    }

    pub fn deselect() -> Self {
        DesignerCommand::SelectElement(None)
    }

    /// `MarkSaved` stamped with the current time.
    pub fn mark_saved() -> Self {
        DesignerCommand::MarkSaved { at: Utc::now() }
    }

    pub fn set_document(document: DesignDocument) -> Self {
        DesignerCommand::SetDocument(Some(Box::new(document)))
    }

    /// Returns true if the intent records a history snapshot when it applies.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            DesignerCommand::AddElement(_)
                | DesignerCommand::DeleteElement(_)
                | DesignerCommand::ReplaceAllElements(_)
                | DesignerCommand::BringToFront(_)
                | DesignerCommand::SendToBack(_)
                | DesignerCommand::DuplicateElement { .. }
        )
    }

    /// Returns the name of the intent for logs.
    pub fn name(&self) -> &'static str {
        match self {
            DesignerCommand::AddElement(_) => "AddElement",
            DesignerCommand::UpdateElement { .. } => "UpdateElement",
            DesignerCommand::DeleteElement(_) => "DeleteElement",
            DesignerCommand::SelectElement(_) => "SelectElement",
            DesignerCommand::ReplaceAllElements(_) => "ReplaceAllElements",
            DesignerCommand::UpdateCanvasSettings(_) => "UpdateCanvasSettings",
            DesignerCommand::SetPreviewMode(_) => "SetPreviewMode",
            DesignerCommand::Undo => "Undo",
            DesignerCommand::Redo => "Redo",
            DesignerCommand::MarkSaved { .. } => "MarkSaved",
            DesignerCommand::MarkDirty => "MarkDirty",
            DesignerCommand::BringToFront(_) => "BringToFront",
            DesignerCommand::SendToBack(_) => "SendToBack",
            DesignerCommand::DuplicateElement { .. } => "DuplicateElement",
            DesignerCommand::SetDocument(_) => "SetDocument",
            DesignerCommand::ApplySaveResult { .. } => "ApplySaveResult",
        }
    }
}
