//! Canvas type definitions: CanvasSettings, CanvasSettingsPatch, CanvasDefaults, PreviewScales, OverlayOptions.

use designkit_core::units::PX_PER_MM;
use designkit_core::ValidationError;
use serde::{Deserialize, Serialize};

fn default_zoom() -> f64 {
    1.0
}

fn default_background() -> String {
    "#ffffff".to_string()
}

/// Print area and editor display flags.
///
/// `width`/`height` are millimeters. `zoom` is editor state only and is never
/// written to the persisted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasSettings {
    #[serde(rename = "width")]
    pub width_mm: f64,
    #[serde(rename = "height")]
    pub height_mm: f64,
    #[serde(default = "default_background")]
    pub background_color: String,
    #[serde(skip, default = "default_zoom")]
    pub zoom: f64,
    #[serde(default)]
    pub show_grid: bool,
    #[serde(default)]
    pub show_safe_zone: bool,
    #[serde(default)]
    pub show_bleed: bool,
}

impl CanvasSettings {
    /// Creates settings for a print area; every editor flag starts off.
    pub fn new(width_mm: f64, height_mm: f64, background_color: impl Into<String>) -> Self {
        Self {
            width_mm,
            height_mm,
            background_color: background_color.into(),
            zoom: 1.0,
            show_grid: false,
            show_safe_zone: false,
            show_bleed: false,
        }
    }

    /// Print area size in pixels at `px_per_mm`.
    pub fn size_px(&self, px_per_mm: f64) -> (f64, f64) {
        (self.width_mm * px_per_mm, self.height_mm * px_per_mm)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [("width", self.width_mm), ("height", self.height_mm)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ValidationError::InvalidDimension {
                    field: field.to_string(),
                    value,
                });
            }
        }
        if !self.zoom.is_finite() || self.zoom <= 0.0 {
            return Err(ValidationError::InvalidDimension {
                field: "zoom".to_string(),
                value: self.zoom,
            });
        }
        crate::color::Rgba::from_hex(&self.background_color)?;
        Ok(())
    }

    /// Merge a partial update. Returns true if anything changed.
    pub fn apply_patch(&mut self, patch: &CanvasSettingsPatch) -> bool {
        let before = self.clone();
        if let Some(v) = patch.width_mm {
            self.width_mm = v;
        }
        if let Some(v) = patch.height_mm {
            self.height_mm = v;
        }
        if let Some(v) = &patch.background_color {
            self.background_color = v.clone();
        }
        if let Some(v) = patch.zoom {
            self.zoom = v;
        }
        if let Some(v) = patch.show_grid {
            self.show_grid = v;
        }
        if let Some(v) = patch.show_safe_zone {
            self.show_safe_zone = v;
        }
        if let Some(v) = patch.show_bleed {
            self.show_bleed = v;
        }
        *self != before
    }
}

impl From<CanvasDefaults> for CanvasSettings {
    fn from(d: CanvasDefaults) -> Self {
        CanvasSettings::new(d.width_mm, d.height_mm, d.background_color)
    }
}

/// Partial canvas settings update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasSettingsPatch {
    #[serde(default, rename = "width", skip_serializing_if = "Option::is_none")]
    pub width_mm: Option<f64>,
    #[serde(default, rename = "height", skip_serializing_if = "Option::is_none")]
    pub height_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_grid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_safe_zone: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_bleed: Option<bool>,
}

impl CanvasSettingsPatch {
    pub fn size(width_mm: f64, height_mm: f64) -> Self {
        Self {
            width_mm: Some(width_mm),
            height_mm: Some(height_mm),
            ..Self::default()
        }
    }

    pub fn zoom(zoom: f64) -> Self {
        Self {
            zoom: Some(zoom),
            ..Self::default()
        }
    }

    pub fn background(color: impl Into<String>) -> Self {
        Self {
            background_color: Some(color.into()),
            ..Self::default()
        }
    }
}

/// Canvas a fresh session starts from. Hosts pick one explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasDefaults {
    pub width_mm: f64,
    pub height_mm: f64,
    pub background_color: String,
}

impl CanvasDefaults {
    /// Narrow banner strip used by the product customizer.
    pub const BANNER_190X15: (f64, f64) = (190.0, 15.0);
    /// Generic on-screen canvas used by the admin studio.
    pub const SCREEN_800X600: (f64, f64) = (800.0, 600.0);

    pub fn new(width_mm: f64, height_mm: f64) -> Self {
        Self {
            width_mm,
            height_mm,
            background_color: default_background(),
        }
    }

    pub fn banner() -> Self {
        let (w, h) = Self::BANNER_190X15;
        Self::new(w, h)
    }

    pub fn screen() -> Self {
        let (w, h) = Self::SCREEN_800X600;
        Self::new(w, h)
    }
}

/// Pixel density for the live editor and scale of the print-preview dialog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewScales {
    pub editor_px_per_mm: f64,
    pub print_preview_factor: f64,
}

impl PreviewScales {
    /// CSS reference density for both views.
    pub const STANDARD: PreviewScales = PreviewScales {
        editor_px_per_mm: PX_PER_MM,
        print_preview_factor: 1.0,
    };

    /// Print preview drawn at half the editor density.
    pub const HALF_PRINT_PREVIEW: PreviewScales = PreviewScales {
        editor_px_per_mm: PX_PER_MM,
        print_preview_factor: 0.5,
    };

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("editor_px_per_mm", self.editor_px_per_mm),
            ("print_preview_factor", self.print_preview_factor),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ValidationError::InvalidDimension {
                    field: field.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Editor guide geometry, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayOptions {
    pub safe_zone_mm: f64,
    pub bleed_mm: f64,
    pub grid_spacing_mm: f64,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            safe_zone_mm: 3.0,
            bleed_mm: 3.0,
            grid_spacing_mm: 10.0,
        }
    }
}
