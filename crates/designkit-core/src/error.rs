//! Error handling for DesignKit
//!
//! Provides error types for every layer the design-document engine talks to:
//! - Validation errors (missing input before an editor action)
//! - Persistence errors (load/create/update through the document collaborator)
//! - Asset errors (artwork upload and media resolution)
//! - Export errors (layout projection and backend encoding)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Validation error type
///
/// Raised locally before an action runs. These never reach a global boundary;
/// hosts surface them inline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A text element needs content before it can be placed
    #[error("Text content is required")]
    EmptyText,

    /// An action needs a selected element
    #[error("No element selected")]
    NoSelection,

    /// A dimension is negative or not finite
    #[error("Invalid dimension '{field}': {value}")]
    InvalidDimension {
        /// The field name.
        field: String,
        /// The offending value.
        value: f64,
    },

    /// A color string is not a #rgb / #rrggbb / #rrggbbaa hex value
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Unknown export/file format name
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Generic validation error
    #[error("{0}")]
    Other(String),
}

/// Persistence error type
///
/// Represents failures of the external document collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PersistenceError {
    /// Document does not exist
    #[error("Document not found: {id}")]
    NotFound {
        /// The requested document id.
        id: String,
    },

    /// The stored version moved on since the client last saw it
    #[error("Version conflict on {id}: expected {expected}, found {actual}")]
    VersionConflict {
        /// The document id.
        id: String,
        /// The version the client based its patch on.
        expected: u64,
        /// The version currently stored.
        actual: u64,
    },

    /// There is no current document to attach a patch to
    #[error("No current document")]
    NoDocument,

    /// Transport or server failure
    #[error("Persistence request failed: {reason}")]
    RequestFailed {
        /// The reason the request failed.
        reason: String,
    },

    /// The response could not be decoded
    #[error("Invalid response: {reason}")]
    InvalidResponse {
        /// The decode failure.
        reason: String,
    },
}

/// Asset error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssetError {
    /// Upload failed at the collaborator
    #[error("Upload failed: {reason}")]
    UploadFailed {
        /// The reason the upload failed.
        reason: String,
    },

    /// The element the asset was meant for no longer exists
    #[error("Element {element_id} no longer exists")]
    ElementGone {
        /// The element id.
        element_id: String,
    },

    /// The target element is not an image
    #[error("Element {element_id} is not an image")]
    NotAnImage {
        /// The element id.
        element_id: String,
    },

    /// Empty payload
    #[error("Asset payload is empty")]
    EmptyPayload,
}

/// Export error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    /// The backend cannot produce this format
    #[error("Format {format} not supported by {backend}")]
    UnsupportedFormat {
        /// The requested format.
        format: String,
        /// The backend name.
        backend: String,
    },

    /// Canvas has zero area at the requested scale
    #[error("Canvas has no drawable area ({width}x{height} px)")]
    EmptyCanvas {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },

    /// Encoding the output failed
    #[error("Encoding failed: {reason}")]
    EncodingFailed {
        /// The encoder error.
        reason: String,
    },

    /// Server-side export failed
    #[error("Remote export failed: {reason}")]
    RemoteFailed {
        /// The reason the export failed.
        reason: String,
    },
}

/// Main error type for DesignKit
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Validation error
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Persistence error
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Asset error
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// Export error
    #[error(transparent)]
    Export(#[from] ExportError),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a version conflict
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Error::Persistence(PersistenceError::VersionConflict { .. })
        )
    }

    /// Check if the user can retry the action unchanged
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Persistence(PersistenceError::RequestFailed { .. })
                | Error::Asset(AssetError::UploadFailed { .. })
                | Error::Export(ExportError::RemoteFailed { .. })
        )
    }

    /// Check if this is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Stable code for notifications and logs
    pub fn code(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation_error",
            Error::Persistence(PersistenceError::VersionConflict { .. }) => "version_conflict",
            Error::Persistence(PersistenceError::NotFound { .. }) => "not_found",
            Error::Persistence(_) => "persistence_error",
            Error::Asset(_) => "asset_error",
            Error::Export(_) => "export_error",
            Error::Json(_) => "serialization_error",
            Error::Io(_) => "io_error",
            Error::Other(_) => "internal_error",
        }
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
