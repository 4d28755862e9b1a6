//! Serialization and deserialization for design files.
//!
//! A design file is a JSON snapshot of the canvas settings and element list
//! with a little metadata, for hosts that keep designs on disk.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::document::{Customizations, DesignDocument};

/// Design file format version
pub const FILE_FORMAT_VERSION: &str = "1.0";

/// Complete design file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignFile {
    pub version: String,
    pub metadata: DesignMetadata,
    pub customizations: Customizations,
}

/// Design metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignMetadata {
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    /// Id of the persisted document this file was exported from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
}

impl DesignFile {
    /// Create a new design file
    pub fn new(name: impl Into<String>, customizations: Customizations) -> Self {
        let now = Utc::now();
        Self {
            version: FILE_FORMAT_VERSION.to_string(),
            metadata: DesignMetadata {
                name: name.into(),
                created: now,
                modified: now,
                description: String::new(),
                document_id: None,
            },
            customizations,
        }
    }

    /// Snapshot of a persisted document.
    pub fn from_document(document: &DesignDocument) -> Self {
        Self {
            version: FILE_FORMAT_VERSION.to_string(),
            metadata: DesignMetadata {
                name: document.name.clone(),
                created: document.created_at,
                modified: document.updated_at,
                description: document.description.clone().unwrap_or_default(),
                document_id: Some(document.id.clone()),
            },
            customizations: document.customizations.clone(),
        }
    }

    /// Save design to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize design")?;

        std::fs::write(path.as_ref(), json).context("Failed to write design file")?;

        Ok(())
    }

    /// Load design from file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read design file")?;

        let design: DesignFile =
            serde_json::from_str(&content).context("Failed to parse design file")?;

        if design.version != FILE_FORMAT_VERSION {
            tracing::warn!(
                "Design file version {} differs from {}",
                design.version,
                FILE_FORMAT_VERSION
            );
        }

        Ok(design)
    }
}
