use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ingest: IngestConfig,
    pub logging: LoggingConfig,
}

/// Content-tree builder and reader settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Trim each run of character data before it is merged into the tree.
    pub trim_whitespace: bool,
    /// Deepest nesting of unrecognized elements accepted before the document is rejected.
    pub max_unrecognized_depth: usize,
    /// Realm used when the caller does not name one.
    pub default_realm: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// Directory for rolling log files. No file output when unset.
    pub log_dir: Option<PathBuf>,
    /// Write the file layer as JSON lines.
    pub json_file: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            trim_whitespace: true,
            max_unrecognized_depth: 256,
            default_realm: "homebrew".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
            json_file: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/ttrpg-compendium/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        if !config_path.exists() {
            log::debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Self::default();
        }

        match Self::load_from(&config_path) {
            Ok(config) => {
                log::info!("Loaded config from {}", config_path.display());
                config
            }
            Err(e) => {
                log::warn!(
                    "Failed to load config at {}: {e}, using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("ttrpg-compendium").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
