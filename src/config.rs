use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::compiler::Backend;

/// Defaults for the `mediapred` command-line tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Table used when the relational backend is not given one.
    pub default_table: String,
    pub backend: Backend,
    /// Compile photo-library and media-store queries in album context.
    pub album_query: bool,
    /// Log level: error, warn, info, debug or trace.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_table: "Photos".to_string(),
            backend: Backend::Relational,
            album_query: false,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    pub fn get_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mediapred")
            .join("config.toml")
    }

    /// Load from the default location, falling back to defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
