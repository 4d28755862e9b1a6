//! Event type definitions for the event bus.
//!
//! Events are cloneable and serializable so hosts can log or replay them.

use serde::{Deserialize, Serialize};

/// Root event enum for all engine events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    /// Document lifecycle
    Document(DocumentEvent),
    /// Manual and automatic saves
    Save(SaveEvent),
    /// Artwork uploads and media resolution
    Asset(AssetEvent),
    /// Exports and previews
    Export(ExportEvent),
    /// Transient user-facing notifications (toasts)
    Notification(Notification),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Document(_) => EventCategory::Document,
            AppEvent::Save(_) => EventCategory::Save,
            AppEvent::Asset(_) => EventCategory::Asset,
            AppEvent::Export(_) => EventCategory::Export,
            AppEvent::Notification(_) => EventCategory::Notification,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Document(e) => e.description(),
            AppEvent::Save(e) => e.description(),
            AppEvent::Asset(e) => e.description(),
            AppEvent::Export(e) => e.description(),
            AppEvent::Notification(n) => format!("[{}] {}", n.level, n.message),
        }
    }

    /// Build an info notification
    pub fn info(message: impl Into<String>) -> Self {
        AppEvent::Notification(Notification::new(NotificationLevel::Info, message))
    }

    /// Build a success notification
    pub fn success(message: impl Into<String>) -> Self {
        AppEvent::Notification(Notification::new(NotificationLevel::Success, message))
    }

    /// Build an error notification
    pub fn error(message: impl Into<String>) -> Self {
        AppEvent::Notification(Notification::new(NotificationLevel::Error, message))
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Document lifecycle events.
    Document,
    /// Save events.
    Save,
    /// Asset events.
    Asset,
    /// Export events.
    Export,
    /// User-facing notifications.
    Notification,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Document => write!(f, "Document"),
            EventCategory::Save => write!(f, "Save"),
            EventCategory::Asset => write!(f, "Asset"),
            EventCategory::Export => write!(f, "Export"),
            EventCategory::Notification => write!(f, "Notification"),
        }
    }
}

/// Document lifecycle events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DocumentEvent {
    /// A persisted document was loaded into a session.
    Loaded {
        /// Document id.
        document_id: String,
        /// Version loaded.
        version: u64,
    },
    /// A new document was created on first save.
    Created {
        /// Server-assigned id.
        document_id: String,
    },
    /// A session started from a blank canvas.
    Blank {
        /// Canvas width in mm.
        width_mm: f64,
        /// Canvas height in mm.
        height_mm: f64,
    },
}

impl DocumentEvent {
    fn description(&self) -> String {
        match self {
            DocumentEvent::Loaded {
                document_id,
                version,
            } => format!("Loaded {} v{}", document_id, version),
            DocumentEvent::Created { document_id } => format!("Created {}", document_id),
            DocumentEvent::Blank {
                width_mm,
                height_mm,
            } => format!("Blank canvas {}x{} mm", width_mm, height_mm),
        }
    }
}

/// What triggered a save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveTrigger {
    /// The user pressed save.
    Manual,
    /// The debounce timer fired.
    Auto,
}

/// Save events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SaveEvent {
    /// A persist call was issued.
    Started {
        /// Document id.
        document_id: String,
        /// Trigger.
        trigger: SaveTrigger,
    },
    /// The collaborator accepted the patch.
    Saved {
        /// Document id.
        document_id: String,
        /// New server version.
        version: u64,
        /// Trigger.
        trigger: SaveTrigger,
    },
    /// The persist call failed; the document stays dirty.
    Failed {
        /// Document id, if one exists.
        document_id: Option<String>,
        /// Error code.
        code: String,
        /// Error message.
        message: String,
        /// Trigger.
        trigger: SaveTrigger,
    },
}

impl SaveEvent {
    fn description(&self) -> String {
        match self {
            SaveEvent::Started {
                document_id,
                trigger,
            } => format!("Saving {} ({:?})", document_id, trigger),
            SaveEvent::Saved {
                document_id,
                version,
                ..
            } => format!("Saved {} v{}", document_id, version),
            SaveEvent::Failed { code, message, .. } => {
                format!("Save failed [{}]: {}", code, message)
            }
        }
    }
}

/// Asset events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssetEvent {
    /// Upload finished and the element now references the media.
    Attached {
        /// Element id.
        element_id: String,
        /// Media id.
        media_id: String,
    },
    /// Upload finished after the element was removed.
    Discarded {
        /// Element id.
        element_id: String,
    },
    /// A media url could not be loaded.
    LoadFailed {
        /// Media url.
        url: String,
    },
}

impl AssetEvent {
    fn description(&self) -> String {
        match self {
            AssetEvent::Attached {
                element_id,
                media_id,
            } => format!("Attached {} to {}", media_id, element_id),
            AssetEvent::Discarded { element_id } => {
                format!("Discarded upload for {}", element_id)
            }
            AssetEvent::LoadFailed { url } => format!("Failed to load {}", url),
        }
    }
}

/// Export events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExportEvent {
    /// Output produced.
    Completed {
        /// Format name.
        format: String,
        /// Output size in bytes.
        bytes: usize,
    },
    /// Export failed.
    Failed {
        /// Format name.
        format: String,
        /// Error message.
        message: String,
    },
}

impl ExportEvent {
    fn description(&self) -> String {
        match self {
            ExportEvent::Completed { format, bytes } => {
                format!("Exported {} ({} bytes)", format, bytes)
            }
            ExportEvent::Failed { format, message } => {
                format!("Export {} failed: {}", format, message)
            }
        }
    }
}

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl std::fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationLevel::Info => write!(f, "info"),
            NotificationLevel::Success => write!(f, "success"),
            NotificationLevel::Warning => write!(f, "warning"),
            NotificationLevel::Error => write!(f, "error"),
        }
    }
}

/// A transient message for the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}
