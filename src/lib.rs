//! # DesignKit
//!
//! Headless design-document engine for printable product customization.
//! A host embeds it to edit a print-area canvas of text, image and shape
//! elements with undo/redo, debounced auto-save and file export.
//!
//! ## Architecture
//!
//! DesignKit is organized as a workspace with multiple crates:
//!
//! 1. **designkit-core** - Units, geometry, errors and the event bus
//! 2. **designkit-designer** - Element model, editor state, history, persistence,
//!    auto-save, assets, renderer and export
//! 3. **designkit-settings** - JSON/TOML host configuration
//! 4. **designkit** - This facade: re-exports plus logging setup

pub use designkit_core::{event_bus, units};
pub use designkit_designer as designer;
pub use designkit_settings as settings;

pub use designkit_core::{
    AppEvent, AssetError, Error, EventBus, EventBusConfig, ExportError, PersistenceError,
    SaveTrigger, ValidationError,
};
pub use designkit_designer::{
    CanvasDefaults, CanvasElement, CanvasSettings, DesignerCommand, DesignerError, DesignerState,
    DocumentApi, EditorStore, Exporter, Renderer, SessionConfig,
};
pub use designkit_settings::{Config, SettingsPersistence};

/// Output style of [`init_logging_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable, multi-line
    #[default]
    Pretty,
    /// One JSON object per line, for log collectors
    Json,
}

/// Initialize logging with the default configuration
///
/// Level comes from `RUST_LOG`, defaulting to INFO. Safe to call more than
/// once; later calls return an error instead of replacing the subscriber.
pub fn init_logging() -> anyhow::Result<()> {
    init_logging_with(LogFormat::default())
}

/// Initialize logging in the given output format.
pub fn init_logging_with(format: LogFormat) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stdout)
                    .with_target(true)
                    .with_level(true)
                    .with_thread_names(true)
                    .with_line_number(true)
                    .pretty(),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stdout)
                    .with_target(true)
                    .json(),
            )
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice_does_not_panic() {
        let _ = init_logging();
        assert!(init_logging_with(LogFormat::Json).is_err());
    }
}
