use anyhow::{anyhow, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::PathBuf;

use crate::resolver::strategy::{DEFAULT_FALLBACK_LAUNCHER, DEFAULT_INSTALL_MARKER};
use crate::resolver::SearchSettings;

pub mod loader;

pub use loader::ConfigLoader;

pub const ENV_LOG_LEVEL: &str = "MAGICK_EXEC_LOG_LEVEL";
pub const ENV_INSTALL_MARKER: &str = "MAGICK_EXEC_INSTALL_MARKER";
pub const ENV_LAUNCHER: &str = "MAGICK_EXEC_LAUNCHER";

/// Directory holding the user's `config.toml`.
pub fn get_config_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", "magick-exec")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| anyhow!("Could not determine home directory"))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub install_marker: String,
    pub fallback_launcher: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: None,
            install_marker: DEFAULT_INSTALL_MARKER.to_string(),
            fallback_launcher: DEFAULT_FALLBACK_LAUNCHER.to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge_env_vars(&mut self) {
        self.merge_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`, ignoring empty values.
    pub fn merge_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(level) = value(ENV_LOG_LEVEL) {
            self.log_level = Some(level);
        }

        if let Some(marker) = value(ENV_INSTALL_MARKER) {
            self.install_marker = marker;
        }

        if let Some(launcher) = value(ENV_LAUNCHER) {
            self.fallback_launcher = launcher;
        }
    }

    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            install_marker: self.install_marker.clone(),
            fallback_launcher: self.fallback_launcher.clone(),
        }
    }
}
