//! # DesignKit Designer
//!
//! Headless design-document engine: a print-area canvas measured in
//! millimeters holding text, image and shape elements, edited through
//! discrete commands with undo/redo, persisted through an injected
//! collaborator with debounced auto-save, and projected for display,
//! print preview and file export.
//!
//! ## Core Components
//!
//! ### Document
//! - **Model**: Canvas elements (text, image, shape) and their properties
//! - **Canvas**: Physical print-area settings and display flags
//! - **Document**: Persisted, versioned design record
//!
//! ### Editing
//! - **Commands**: Every edit is a [`DesignerCommand`]
//! - **State**: [`DesignerState`] applies commands and tracks dirty/revision
//! - **History**: Bounded snapshot undo/redo of the element array
//! - **Store**: Caller-constructed [`EditorStore`], one per editor session
//!
//! ### I/O
//! - **Persistence**: [`DocumentApi`] collaborator trait plus an in-memory implementation
//! - **Auto-save**: Debounced saves with edit-during-save detection
//! - **Assets**: Artwork upload with stale-response guard
//! - **Design files**: JSON import/export for offline hosts
//!
//! ### Output
//! - **Renderer**: Render tree projection with static or interactive strategy
//! - **Export**: Layout projection with SVG and raster backends, PDF via the collaborator
//! - **Pricing**: Cost estimate from canvas area and element counts
//!
//! ## Architecture
//!
//! ```text
//! EditorStore (RwLock<DesignerState> + revision watch)
//!   ├── DesignerState
//!   │     ├── CanvasSettings
//!   │     ├── Vec<CanvasElement>
//!   │     └── History
//!   ├── AutoSaveScheduler ── DocumentSaver ── dyn DocumentApi
//!   ├── AssetUploader ───────────────────────┘
//!   ├── Renderer (project + InteractionStrategy) -> RenderTree
//!   └── Exporter (ExportLayout -> ExportBackend) -> ExportOutput
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use designkit_designer::*;
//!
//! let config = SessionConfig::new(CanvasSettings::from(CanvasDefaults::banner()), 100);
//! let store = EditorStore::new(DesignerState::new(config), Arc::new(EventBus::new()));
//!
//! store.dispatch(DesignerCommand::AddElement(CanvasElement::text(
//!     "t1", 10.0, 10.0, 200.0, 40.0, TextContent::new("Hello"),
//! )));
//! store.dispatch(DesignerCommand::Undo);
//! ```

pub mod assets;
pub mod autosave;
pub mod canvas;
pub mod color;
pub mod commands;
pub mod designer_state;
pub mod document;
pub mod export;
pub mod history;
pub mod model;
pub mod persistence;
pub mod pricing;
pub mod renderer;
pub mod serialization;
pub mod store;
pub mod viewport;

pub use assets::{AssetStatus, AssetStatusRegistry, AssetUploader};
pub use autosave::{
    AutoSaveConfig, AutoSaveHandle, AutoSaveScheduler, DocumentSaver, SaveOutcome, SkipReason,
    DEFAULT_AUTOSAVE_INTERVAL,
};
pub use canvas::{CanvasDefaults, CanvasSettings, CanvasSettingsPatch, OverlayOptions, PreviewScales};
pub use color::Rgba;
pub use commands::DesignerCommand;
pub use designer_state::{reduce, DesignerError, DesignerState, SessionConfig};
pub use document::{Customizations, DesignDocument, DesignStatus, DocumentDraft, DocumentPatch};
pub use export::{
    ExportBackend, ExportFormat, ExportItem, ExportLayout, ExportOptions, ExportOutput,
    ExportResult, Exporter, PreviewScale, RasterBackend, SvgBackend, Transform,
};
pub use history::{ElementSnapshot, History, DEFAULT_MAX_DEPTH};
pub use model::{
    CanvasElement, ElementKind, ElementPatch, ElementProperties, ElementType, ImageContent,
    ImageFit, ShapeContent, ShapeKind, TextAlign, TextContent,
};
pub use persistence::{
    ApiOperation, ArtworkMeta, DocumentApi, ExportRequest, InMemoryDocumentApi, RemoteExport,
    UploadedArtwork,
};
pub use pricing::{estimate_cost, CostEstimate, PricingRates};
pub use renderer::{
    paint_order, project, HandleKind, InteractionStrategy, InteractiveStrategy, NodeContent,
    Overlay, RenderContext, RenderNode, RenderTree, Renderer, ShapeGeometry, StaticStrategy,
};
pub use serialization::{DesignFile, DesignMetadata, FILE_FORMAT_VERSION};
pub use store::EditorStore;
pub use viewport::Viewport;
