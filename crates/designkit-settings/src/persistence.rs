//! Settings Persistence
//!
//! Keeps a host's configuration tied to the file it came from.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::SettingsResult;

/// Configuration bound to its file on disk
#[derive(Debug, Clone)]
pub struct SettingsPersistence {
    config: Config,
    path: PathBuf,
}

impl SettingsPersistence {
    /// Load settings from file
    pub fn load_from_file(path: impl Into<PathBuf>) -> SettingsResult<Self> {
        let path = path.into();
        let config = Config::load_from_file(&path)?;
        Ok(Self { config, path })
    }

    /// Load the file if it exists, otherwise write `initial` there first.
    pub fn load_or_init(path: impl Into<PathBuf>, initial: Config) -> SettingsResult<Self> {
        let path = path.into();
        if path.exists() {
            return Self::load_from_file(path);
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        initial.save_to_file(&path)?;
        tracing::info!("Created settings file {}", path.display());
        Ok(Self {
            config: initial,
            path,
        })
    }

    /// Write the current config back to its file
    pub fn save(&self) -> SettingsResult<()> {
        self.config.save_to_file(&self.path)
    }

    /// Apply `f` to the config and save; nothing changes if the result is invalid.
    pub fn update<F>(&mut self, f: F) -> SettingsResult<()>
    where
        F: FnOnce(&mut Config),
    {
        let mut next = self.config.clone();
        f(&mut next);
        next.save_to_file(&self.path)?;
        self.config = next;
        Ok(())
    }

    /// Get reference to config
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
