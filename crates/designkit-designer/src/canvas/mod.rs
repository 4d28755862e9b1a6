//! Canvas settings: the physical print area plus editor-only display state.

mod types;

pub use types::{CanvasDefaults, CanvasSettings, CanvasSettingsPatch, OverlayOptions, PreviewScales};
