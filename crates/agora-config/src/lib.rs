use agora_engine::forum::ForumSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value in config file at {config_path}: {field} must be at least 1")]
    ConfigValueError {
        config_path: PathBuf,
        field: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the forum's users/, posts/ and comments/.
    pub data_path: PathBuf,
    /// Leave unset to accept documents of any depth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_content_depth: Option<usize>,
    #[serde(default = "default_preview_length")]
    pub preview_length: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_preview_length() -> usize {
    ForumSettings::default().preview_length
}

fn default_page_size() -> usize {
    ForumSettings::default().page_size
}

impl Config {
    /// A config with default limits for the given data directory.
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        let settings = ForumSettings::default();
        Self {
            data_path: data_path.into(),
            max_content_depth: settings.max_content_depth,
            preview_length: settings.preview_length,
            page_size: settings.page_size,
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        for (field, value) in [
            ("max_content_depth", config.max_content_depth),
            ("page_size", Some(config.page_size)),
        ] {
            if value == Some(0) {
                return Err(ConfigError::ConfigValueError {
                    config_path: config_path.to_path_buf(),
                    field,
                });
            }
        }

        // Expand shell variables and tilde in the data directory
        config.data_path = Self::expand_path(&config.data_path).unwrap_or(config.data_path);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/agora");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Limits handed to the forum service.
    pub fn forum_settings(&self) -> ForumSettings {
        ForumSettings {
            max_content_depth: self.max_content_depth,
            preview_length: self.preview_length,
            page_size: self.page_size,
        }
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
