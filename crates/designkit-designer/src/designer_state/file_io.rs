//! Document payloads (customizations, draft, patch) and design-file save/load.

use std::path::Path;

use super::DesignerState;
use crate::document::{Customizations, DocumentDraft, DocumentPatch};
use crate::pricing::{estimate_cost, CostEstimate, PricingRates};
use crate::serialization::DesignFile;

impl DesignerState {
    /// The persisted shape of the working copy.
    pub fn to_customizations(&self) -> Customizations {
        Customizations::new(self.canvas.clone(), self.elements.clone())
    }

    /// Payload for creating a document from this session.
    pub fn to_draft(&self, name: impl Into<String>) -> DocumentDraft {
        DocumentDraft::new(name, self.to_customizations())
    }

    /// Payload for updating the current document.
    pub fn to_patch(&self, expected_version: Option<u64>) -> DocumentPatch {
        DocumentPatch {
            customizations: Some(self.to_customizations()),
            expected_version,
            ..DocumentPatch::default()
        }
    }

    /// Price of the working copy.
    pub fn estimated_cost(&self, rates: &PricingRates) -> CostEstimate {
        estimate_cost(&self.canvas, &self.elements, rates)
    }

    /// Save the working copy to a design file. The dirty flag is not touched:
    /// the document collaborator stays the authority.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let file = match self.document() {
            Some(doc) => {
                let mut file = DesignFile::from_document(doc);
                file.customizations = self.to_customizations();
                file.metadata.modified = chrono::Utc::now();
                file
            }
            None => DesignFile::new(self.display_name().trim_end_matches('*'), self.to_customizations()),
        };
        file.save_to_file(path)
    }

    /// Load a design file into the working copy.
    ///
    /// Replaces canvas and elements (editor zoom is kept), clears history and
    /// selection, and marks the session dirty so it is persisted next.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let file = DesignFile::load_from_file(&path)?;

        let zoom = self.canvas.zoom;
        self.canvas = file.customizations.canvas;
        self.canvas.zoom = zoom;
        self.elements = file.customizations.elements;
        self.selected_id = None;
        self.clear_history();
        self.touch();

        tracing::info!(
            "Loaded design '{}' ({} elements) from {}",
            file.metadata.name,
            self.elements.len(),
            path.as_ref().display()
        );
        Ok(())
    }
}
