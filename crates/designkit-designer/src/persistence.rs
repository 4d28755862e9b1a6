//! Document collaborator: load, create, update, upload and server-side export.
//!
//! The engine only depends on the [`DocumentApi`] trait; hosts implement it
//! over whatever transport they use. [`InMemoryDocumentApi`] is a complete
//! in-process implementation for tests and offline hosts.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use designkit_core::PersistenceError;

use crate::document::{DesignDocument, DocumentDraft, DocumentPatch};
use crate::export::ExportFormat;

/// Metadata sent with an artwork upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkMeta {
    pub file_name: String,
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_id: Option<String>,
}

impl ArtworkMeta {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            design_id: None,
        }
    }
}

/// Result of an artwork upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedArtwork {
    pub media_id: String,
    pub url: String,
}

/// Server-side export parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub format: ExportFormat,
    /// 1..=100, used by lossy formats.
    pub quality: u8,
    /// Output size in pixels; the server picks when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dims: Option<(u32, u32)>,
}

/// Server-side export result.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteExport {
    Url(String),
    Blob { bytes: Vec<u8>, mime: String },
}

#[async_trait]
pub trait DocumentApi: Send + Sync {
    async fn load_document(&self, id: &str) -> Result<DesignDocument, PersistenceError>;

    async fn create_document(&self, draft: DocumentDraft)
        -> Result<DesignDocument, PersistenceError>;

    /// Partial update. Rejects with `VersionConflict` when the patch carries an
    /// `expected_version` that differs from the stored one.
    async fn update_document(
        &self,
        id: &str,
        patch: DocumentPatch,
    ) -> Result<DesignDocument, PersistenceError>;

    async fn upload_artwork(
        &self,
        bytes: Vec<u8>,
        meta: ArtworkMeta,
    ) -> Result<UploadedArtwork, PersistenceError>;

    async fn export_document(
        &self,
        id: &str,
        request: ExportRequest,
    ) -> Result<RemoteExport, PersistenceError>;
}

/// Operations that can be made to fail in [`InMemoryDocumentApi`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    Load,
    Create,
    Update,
    Upload,
    Export,
}

#[derive(Default)]
struct Inner {
    documents: HashMap<String, DesignDocument>,
    media: HashMap<String, (ArtworkMeta, Vec<u8>)>,
    failures: HashMap<ApiOperation, PersistenceError>,
    calls: HashMap<ApiOperation, usize>,
}

/// In-process document store.
///
/// Bumps `version` and `updated_at` on every update, detects version
/// conflicts, and can be told to fail operations or respond slowly.
#[derive(Default)]
pub struct InMemoryDocumentApi {
    inner: Mutex<Inner>,
    latency: Option<Duration>,
}

impl InMemoryDocumentApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call waits this long before answering (uses tokio time).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Seed a stored document.
    pub fn insert(&self, document: DesignDocument) {
        self.inner
            .lock()
            .documents
            .insert(document.id.clone(), document);
    }

    pub fn get(&self, id: &str) -> Option<DesignDocument> {
        self.inner.lock().documents.get(id).cloned()
    }

    pub fn media(&self, media_id: &str) -> Option<Vec<u8>> {
        self.inner.lock().media.get(media_id).map(|(_, b)| b.clone())
    }

    /// Make `op` fail with `error` until cleared.
    pub fn fail(&self, op: ApiOperation, error: PersistenceError) {
        self.inner.lock().failures.insert(op, error);
    }

    pub fn clear_failure(&self, op: ApiOperation) {
        self.inner.lock().failures.remove(&op);
    }

    /// Number of calls made to `op`, including failed ones.
    pub fn calls(&self, op: ApiOperation) -> usize {
        self.inner.lock().calls.get(&op).copied().unwrap_or(0)
    }

    async fn begin(&self, op: ApiOperation) -> Result<(), PersistenceError> {
        *self.inner.lock().calls.entry(op).or_insert(0) += 1;
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match self.inner.lock().failures.get(&op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentApi for InMemoryDocumentApi {
    async fn load_document(&self, id: &str) -> Result<DesignDocument, PersistenceError> {
        self.begin(ApiOperation::Load).await?;
        self.get(id).ok_or_else(|| PersistenceError::NotFound { id: id.to_string() })
    }

    async fn create_document(
        &self,
        draft: DocumentDraft,
    ) -> Result<DesignDocument, PersistenceError> {
        self.begin(ApiOperation::Create).await?;
        let id = uuid::Uuid::new_v4().to_string();
        let document = DesignDocument::from_draft(id, draft, Utc::now());
        self.insert(document.clone());
        Ok(document)
    }

    async fn update_document(
        &self,
        id: &str,
        patch: DocumentPatch,
    ) -> Result<DesignDocument, PersistenceError> {
        self.begin(ApiOperation::Update).await?;
        let mut inner = self.inner.lock();
        let document = inner
            .documents
            .get_mut(id)
            .ok_or_else(|| PersistenceError::NotFound { id: id.to_string() })?;

        if let Some(expected) = patch.expected_version {
            if expected != document.version {
                return Err(PersistenceError::VersionConflict {
                    id: id.to_string(),
                    expected,
                    actual: document.version,
                });
            }
        }

        document.merge_patch(patch);
        document.version += 1;
        document.updated_at = Utc::now();
        Ok(document.clone())
    }

    async fn upload_artwork(
        &self,
        bytes: Vec<u8>,
        meta: ArtworkMeta,
    ) -> Result<UploadedArtwork, PersistenceError> {
        self.begin(ApiOperation::Upload).await?;
        let media_id = uuid::Uuid::new_v4().to_string();
        let url = format!("memory://media/{}/{}", media_id, meta.file_name);
        self.inner
            .lock()
            .media
            .insert(media_id.clone(), (meta, bytes));
        Ok(UploadedArtwork { media_id, url })
    }

    async fn export_document(
        &self,
        id: &str,
        request: ExportRequest,
    ) -> Result<RemoteExport, PersistenceError> {
        self.begin(ApiOperation::Export).await?;
        if self.get(id).is_none() {
            return Err(PersistenceError::NotFound { id: id.to_string() });
        }
        Ok(RemoteExport::Url(format!(
            "memory://exports/{}.{}",
            id,
            request.format.extension()
        )))
    }
}
