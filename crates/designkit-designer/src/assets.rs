//! Artwork upload for image elements and media load status.

use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;

use designkit_core::{AppEvent, AssetError, AssetEvent, EventBus};

use crate::commands::DesignerCommand;
use crate::designer_state::DesignerError;
use crate::model::{CanvasElement, ElementPatch, ElementType};
use crate::persistence::{ArtworkMeta, DocumentApi, UploadedArtwork};
use crate::store::EditorStore;

/// Placeholder state of an image element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStatus {
    /// No media yet (upload not finished).
    Pending,
    /// Media url could not be loaded.
    Failed,
    Loaded,
}

/// Media urls that failed to load, shared between the host and renderers.
#[derive(Debug, Default)]
pub struct AssetStatusRegistry {
    failed: RwLock<HashSet<String>>,
    events: Option<Arc<EventBus>>,
}

impl AssetStatusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Announce first-time failures as [`AssetEvent::LoadFailed`].
    pub fn with_events(events: Arc<EventBus>) -> Self {
        Self {
            failed: RwLock::default(),
            events: Some(events),
        }
    }

    /// Record a load failure. Returns true the first time a url fails.
    pub fn mark_failed(&self, url: impl Into<String>) -> bool {
        let url = url.into();
        let inserted = self.failed.write().insert(url.clone());
        if inserted {
            tracing::warn!("Media failed to load: {}", url);
            if let Some(bus) = &self.events {
                bus.publish(AppEvent::Asset(AssetEvent::LoadFailed { url })).ok();
            }
        }
        inserted
    }

    /// Forget a failure, e.g. after the host retried successfully.
    pub fn mark_loaded(&self, url: &str) {
        self.failed.write().remove(url);
    }

    pub fn is_failed(&self, url: &str) -> bool {
        self.failed.read().contains(url)
    }

    pub fn status_of(&self, element: &CanvasElement) -> AssetStatus {
        match element.url.as_deref() {
            None | Some("") => AssetStatus::Pending,
            Some(url) if self.is_failed(url) => AssetStatus::Failed,
            Some(_) => AssetStatus::Loaded,
        }
    }
}

/// Uploads artwork and attaches it to image elements.
pub struct AssetUploader {
    store: Arc<EditorStore>,
    api: Arc<dyn DocumentApi>,
}

impl AssetUploader {
    pub fn new(store: Arc<EditorStore>, api: Arc<dyn DocumentApi>) -> Self {
        Self { store, api }
    }

    /// Upload `bytes` for the image element `element_id`.
    ///
    /// The element is re-checked when the upload returns; if it was deleted
    /// meanwhile the result is dropped and `ElementGone` is returned.
    pub async fn upload_for_element(
        &self,
        element_id: &str,
        bytes: Vec<u8>,
        mut meta: ArtworkMeta,
    ) -> Result<UploadedArtwork, AssetError> {
        if bytes.is_empty() {
            return Err(AssetError::EmptyPayload);
        }

        let (kind, document_id) = self.store.read(|s| {
            (
                s.element(element_id).map(|e| e.element_type()),
                s.document_id().map(str::to_string),
            )
        });
        match kind {
            None => {
                return Err(AssetError::ElementGone {
                    element_id: element_id.to_string(),
                })
            }
            Some(ElementType::Image) => {}
            Some(_) => {
                return Err(AssetError::NotAnImage {
                    element_id: element_id.to_string(),
                })
            }
        }
        if meta.design_id.is_none() {
            meta.design_id = document_id;
        }

        let uploaded = match self.api.upload_artwork(bytes, meta).await {
            Ok(u) => u,
            Err(e) => {
                tracing::error!("Upload for {} failed: {}", element_id, e);
                self.publish(AppEvent::error(format!("Upload failed: {}", e)));
                return Err(AssetError::UploadFailed {
                    reason: e.to_string(),
                });
            }
        };

        let patch = ElementPatch::new().with_media(&uploaded.media_id, &uploaded.url);
        match self
            .store
            .try_apply(DesignerCommand::update(element_id, patch))
        {
            Ok(()) => {
                tracing::info!("Attached media {} to {}", uploaded.media_id, element_id);
                self.publish(AppEvent::Asset(AssetEvent::Attached {
                    element_id: element_id.to_string(),
                    media_id: uploaded.media_id.clone(),
                }));
                Ok(uploaded)
            }
            Err(DesignerError::ElementNotFound(_)) => {
                tracing::warn!(
                    "Element {} removed before upload finished, dropping media {}",
                    element_id,
                    uploaded.media_id
                );
                self.publish(AppEvent::Asset(AssetEvent::Discarded {
                    element_id: element_id.to_string(),
                }));
                Err(AssetError::ElementGone {
                    element_id: element_id.to_string(),
                })
            }
            Err(e) => Err(AssetError::UploadFailed {
                reason: e.to_string(),
            }),
        }
    }

    fn publish(&self, event: AppEvent) {
        self.store.events().publish(event).ok();
    }
}
