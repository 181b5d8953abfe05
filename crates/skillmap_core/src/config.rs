//! File-based settings for the skills store.
//!
//! # Responsibility
//! - Load `skillmap.toml` (store path, JSON base directory, logging).
//! - Apply the `SKILLMAP_DB` environment override.
//!
//! # Invariants
//! - A missing settings file yields defaults; a malformed one is an error.
//! - The JSON source kind is fixed by the record mapping, not configurable.

use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Environment variable overriding `store.db_path`.
pub const DB_PATH_ENV: &str = "SKILLMAP_DB";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read settings `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse settings `{}`: {source}", path.display())
            }
            Self::Invalid(message) => write!(f, "invalid settings: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store: StoreSettings,
    pub json: JsonSettings,
    pub logging: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub db_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonSettings {
    /// Directory the `employee.json` endpoint is resolved against.
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    /// Absolute log directory; file logging stays off when unset.
    pub dir: Option<String>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("skillmap.db"),
        }
    }
}

impl Default for JsonSettings {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

impl Settings {
    /// Loads settings from `path`, falling back to defaults when the file is
    /// absent, then applies the `SKILLMAP_DB` override.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let mut settings = if path.exists() {
            let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            toml::from_str::<Settings>(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            Settings::default()
        };

        settings.apply_db_override(std::env::var(DB_PATH_ENV).ok());
        settings.validate()?;
        Ok(settings)
    }

    pub fn apply_db_override(&mut self, db_path: Option<String>) {
        if let Some(db_path) = db_path.filter(|value| !value.trim().is_empty()) {
            self.store.db_path = PathBuf::from(db_path);
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.store.db_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("store.db_path cannot be empty".to_string()));
        }
        if self.json.base_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("json.base_dir cannot be empty".to_string()));
        }
        Ok(())
    }
}
