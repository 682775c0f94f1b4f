use super::{get_config_dir, Config};
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// Layers defaults, a TOML file and the environment into a [`Config`].
pub struct ConfigLoader {
    config: Config,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config: Config::new(),
        }
    }

    /// Load `path`, failing if it is missing or invalid.
    pub async fn load_file(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        self.config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(())
    }

    /// Load `config.toml` from the user config directory when it exists.
    pub async fn load_default(&mut self) -> Result<()> {
        let config_path = get_config_dir()?.join("config.toml");

        if fs::try_exists(&config_path).await.unwrap_or(false) {
            self.load_file(&config_path).await?;
        }

        Ok(())
    }

    /// Load the explicit `path` if given, otherwise the default file, then
    /// apply environment overrides.
    pub async fn load(path: Option<&Path>) -> Result<Config> {
        let mut loader = Self::new();

        match path {
            Some(path) => loader.load_file(path).await?,
            None => loader.load_default().await?,
        }

        loader.config.merge_env_vars();
        Ok(loader.into_config())
    }

    pub fn into_config(self) -> Config {
        self.config
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
