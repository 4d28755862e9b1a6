//! DesignKit Settings Crate
//!
//! Handles host configuration: the starting canvas, auto-save, history,
//! export, pricing and overlay settings, persisted as JSON or TOML.

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{
    AutoSaveSettings, CanvasSection, Config, ConfigFormat, ExportSettings, HistorySettings,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
pub use persistence::SettingsPersistence;
