//! Settings errors.
//!
//! Reading or writing a config file reports [`SettingsError`]; checks on the
//! values themselves report [`ConfigError`].

use std::io;
use thiserror::Error;

use designkit_core::ValidationError;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("Invalid JSON config: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid TOML config: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Could not write TOML config: {0}")]
    TomlWriteError(#[from] toml::ser::Error),

    /// The file parsed but its values were rejected.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Extension other than `.json` or `.toml`.
    #[error("Config file must be .json or .toml, got '{0}'")]
    UnsupportedFormat(String),

    #[error("{key} out of range: {value}")]
    ValueOutOfRange { key: String, value: String },

    /// Canvas or preview value rejected by the designer.
    #[error("Invalid canvas: {0}")]
    Invalid(#[from] ValidationError),
}

impl ConfigError {
    pub(crate) fn out_of_range(key: &str, value: impl ToString) -> Self {
        ConfigError::ValueOutOfRange {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

pub type SettingsResult<T> = Result<T, SettingsError>;

pub type ConfigResult<T> = Result<T, ConfigError>;
