//! Persisted design document and the payloads used to create and update it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::canvas::CanvasSettings;
use crate::model::CanvasElement;

/// Lifecycle status of a design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DesignStatus {
    #[default]
    Draft,
    Completed,
    Archived,
}

impl fmt::Display for DesignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DesignStatus::Draft => write!(f, "DRAFT"),
            DesignStatus::Completed => write!(f, "COMPLETED"),
            DesignStatus::Archived => write!(f, "ARCHIVED"),
        }
    }
}

/// The editable payload of a document: canvas settings plus the element list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customizations {
    #[serde(flatten)]
    pub canvas: CanvasSettings,
    #[serde(default)]
    pub elements: Vec<CanvasElement>,
}

impl Customizations {
    pub fn new(canvas: CanvasSettings, elements: Vec<CanvasElement>) -> Self {
        Self { canvas, elements }
    }
}

/// A design record as stored by the document collaborator.
///
/// `version` and `updated_at` are owned by the collaborator; the editor only
/// copies them back after a save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignDocument {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_variant_id: Option<String>,
    #[serde(default)]
    pub status: DesignStatus,
    pub version: u64,
    #[serde(default)]
    pub is_template: bool,
    #[serde(default)]
    pub is_public: bool,
    pub customizations: Customizations,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
}

impl DesignDocument {
    /// Builds the stored record for a draft. Used by collaborators on create.
    pub fn from_draft(id: impl Into<String>, draft: DocumentDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: draft.name,
            description: draft.description,
            template_id: draft.template_id,
            size_variant_id: draft.size_variant_id,
            status: DesignStatus::Draft,
            version: 1,
            is_template: draft.is_template,
            is_public: draft.is_public,
            customizations: draft.customizations,
            created_at: now,
            updated_at: now,
            estimated_cost: draft.estimated_cost,
        }
    }

    /// Merge a patch into the stored record. Version handling is left to the caller.
    pub fn merge_patch(&mut self, patch: DocumentPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(customizations) = patch.customizations {
            self.customizations = customizations;
        }
        if let Some(cost) = patch.estimated_cost {
            self.estimated_cost = Some(cost);
        }
    }
}

/// Payload for creating a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_variant_id: Option<String>,
    #[serde(default)]
    pub is_template: bool,
    #[serde(default)]
    pub is_public: bool,
    pub customizations: Customizations,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
}

impl DocumentDraft {
    pub fn new(name: impl Into<String>, customizations: Customizations) -> Self {
        Self {
            name: name.into(),
            description: None,
            template_id: None,
            size_variant_id: None,
            is_template: false,
            is_public: false,
            customizations,
            estimated_cost: None,
        }
    }

    pub fn with_template(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = Some(template_id.into());
        self
    }

    pub fn with_size_variant(mut self, size_variant_id: impl Into<String>) -> Self {
        self.size_variant_id = Some(size_variant_id.into());
        self
    }
}

/// Partial update of a stored document.
///
/// When `expected_version` is set the collaborator rejects the patch if the
/// stored version has moved on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DesignStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customizations: Option<Customizations>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<u64>,
}

impl DocumentPatch {
    pub fn customizations(customizations: Customizations) -> Self {
        Self {
            customizations: Some(customizations),
            ..Self::default()
        }
    }

    pub fn with_expected_version(mut self, version: u64) -> Self {
        self.expected_version = Some(version);
        self
    }

    pub fn with_status(mut self, status: DesignStatus) -> Self {
        self.status = Some(status);
        self
    }
}
