//! Configuration for DesignKit hosts
//!
//! Provides configuration file handling and validation, and turns a parsed
//! configuration into the designer's runtime types. Supports JSON and TOML
//! files, chosen by extension.
//!
//! Configuration is organized into sections:
//! - Canvas (required: starting print area and preview scales)
//! - Auto-save (enabled, quiet interval)
//! - History (undo depth)
//! - Export (default format, quality, DPI)
//! - Pricing (base price, area and element rates)
//! - Overlays (safe zone, bleed, grid spacing)

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use designkit_designer::{
    AutoSaveConfig, CanvasDefaults, CanvasSettings, ExportFormat, ExportOptions, OverlayOptions,
    PreviewScales, PricingRates, SessionConfig, DEFAULT_AUTOSAVE_INTERVAL, DEFAULT_MAX_DEPTH,
};

use crate::error::{ConfigError, ConfigResult, SettingsResult};

pub const MIN_AUTOSAVE_INTERVAL_MS: u64 = 1_000;
pub const MAX_AUTOSAVE_INTERVAL_MS: u64 = 60_000;
/// Finest grid a config may ask for. The grid is hidden with `show_grid`.
pub const MIN_GRID_SPACING_MM: f64 = 0.5;

/// Config file encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Format for a file path, by extension.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Canvas a session starts from and the scales used to show it.
///
/// Both parts are required; there is no built-in default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSection {
    pub defaults: CanvasDefaults,
    pub preview: PreviewScales,
}

/// Auto-save settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoSaveSettings {
    pub enabled: bool,
    /// Quiet period after the last edit, in milliseconds
    pub interval_ms: u64,
}

impl Default for AutoSaveSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: DEFAULT_AUTOSAVE_INTERVAL.as_millis() as u64,
        }
    }
}

/// Undo history settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    pub max_depth: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Export defaults
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub default_format: ExportFormat,
    /// JPEG quality, 1-100
    pub quality: u8,
    pub dpi: f64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        let options = ExportOptions::default();
        Self {
            default_format: options.format,
            quality: options.quality,
            dpi: options.dpi,
        }
    }
}

/// Complete host configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub canvas: CanvasSection,
    #[serde(default)]
    pub autosave: AutoSaveSettings,
    #[serde(default)]
    pub history: HistorySettings,
    #[serde(default)]
    pub export: ExportSettings,
    #[serde(default)]
    pub pricing: PricingRates,
    #[serde(default)]
    pub overlays: OverlayOptions,
}

impl Config {
    /// Create a config for an explicitly chosen canvas; other sections use defaults.
    pub fn new(defaults: CanvasDefaults, preview: PreviewScales) -> Self {
        Self {
            canvas: CanvasSection { defaults, preview },
            autosave: AutoSaveSettings::default(),
            history: HistorySettings::default(),
            export: ExportSettings::default(),
            pricing: PricingRates::default(),
            overlays: OverlayOptions::default(),
        }
    }

    /// Parse config text in the given format and validate it.
    pub fn parse(content: &str, format: ConfigFormat) -> SettingsResult<Self> {
        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(content)?,
            ConfigFormat::Toml => toml::from_str(content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Render config text in the given format.
    pub fn render(&self, format: ConfigFormat) -> SettingsResult<String> {
        self.validate()?;
        Ok(match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content, format)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        let format = ConfigFormat::from_path(path)?;
        let content = self.render(format)?;
        std::fs::write(path, content)?;
        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        // Canvas
        CanvasSettings::from(self.canvas.defaults.clone()).validate()?;
        self.canvas.preview.validate()?;

        // Auto-save
        let interval = self.autosave.interval_ms;
        if !(MIN_AUTOSAVE_INTERVAL_MS..=MAX_AUTOSAVE_INTERVAL_MS).contains(&interval) {
            return Err(ConfigError::out_of_range("autosave.interval_ms", interval));
        }

        if self.history.max_depth == 0 {
            return Err(ConfigError::out_of_range("history.max_depth", 0));
        }

        // Export
        if !(1..=100).contains(&self.export.quality) {
            return Err(ConfigError::out_of_range(
                "export.quality",
                self.export.quality,
            ));
        }
        if !self.export.dpi.is_finite() || self.export.dpi <= 0.0 {
            return Err(ConfigError::out_of_range("export.dpi", self.export.dpi));
        }

        // Pricing
        let rates = &self.pricing;
        for (key, value) in [
            ("pricing.base", rates.base),
            ("pricing.per_cm2", rates.per_cm2),
            ("pricing.per_text", rates.per_text),
            ("pricing.per_image", rates.per_image),
            ("pricing.per_shape", rates.per_shape),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::out_of_range(key, value));
            }
        }
        if rates.currency.len() != 3 || !rates.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ConfigError::out_of_range("pricing.currency", &rates.currency));
        }

        // Overlays
        for (key, value) in [
            ("overlays.safe_zone_mm", self.overlays.safe_zone_mm),
            ("overlays.bleed_mm", self.overlays.bleed_mm),
            ("overlays.grid_spacing_mm", self.overlays.grid_spacing_mm),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::out_of_range(key, value));
            }
        }
        if self.overlays.grid_spacing_mm < MIN_GRID_SPACING_MM {
            return Err(ConfigError::out_of_range(
                "overlays.grid_spacing_mm",
                self.overlays.grid_spacing_mm,
            ));
        }

        Ok(())
    }

    /// Starting point of a new editor session.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new(
            CanvasSettings::from(self.canvas.defaults.clone()),
            self.history.max_depth,
        )
    }

    pub fn autosave_config(&self) -> AutoSaveConfig {
        AutoSaveConfig {
            enabled: self.autosave.enabled,
            interval: Duration::from_millis(self.autosave.interval_ms),
        }
    }

    pub fn pricing_rates(&self) -> PricingRates {
        self.pricing.clone()
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions::new(self.export.default_format)
            .with_quality(self.export.quality)
            .with_dpi(self.export.dpi)
    }

    pub fn preview_scales(&self) -> PreviewScales {
        self.canvas.preview
    }

    pub fn overlay_options(&self) -> OverlayOptions {
        self.overlays
    }
}
