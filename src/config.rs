//! Configuration loading
//!
//! Settings come from three layers, highest precedence first: command line
//! overrides, the TOML config file, and built-in defaults. The config file
//! lives at `<config dir>/show_browser/config.toml` unless a path is given
//! explicitly.

use crate::catalog::DEFAULT_BASE_URL;
use crate::render::DEFAULT_PLACEHOLDER_IMAGE;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Number of shows per page when nothing else is configured
pub const DEFAULT_PAGE_SIZE: usize = 20;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has unknown keys
    #[error("Invalid config file {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A setting has an unusable value
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// On-disk configuration file
///
/// Every field is optional; missing fields fall back to defaults.
///
/// ```toml
/// base_url = "https://api.tvmaze.com"
/// page_size = 20
/// placeholder_image = "placeholder.jpg"
/// timeout_secs = 10
/// log_filter = "show_browser=info"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub page_size: Option<usize>,
    pub placeholder_image: Option<String>,
    pub timeout_secs: Option<u64>,
    pub log_filter: Option<String>,
}

/// Settings given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub page_size: Option<usize>,
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Catalog API root
    pub base_url: String,
    /// Shows per page
    pub page_size: usize,
    /// Image reference for records without an image
    pub placeholder_image: String,
    /// Per-request timeout, `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// `tracing` filter directive from the config file
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            timeout: None,
            log_filter: None,
        }
    }
}

impl Config {
    /// Path of the per-user config file, if a config directory is known
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "show_browser")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Loads and resolves the configuration
    ///
    /// An explicitly given path must exist. The default path is optional:
    /// if no file is found there, defaults are used.
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => Some(read_config_file(path)?),
            None => match Self::default_path() {
                Some(path) if path.exists() => Some(read_config_file(&path)?),
                _ => None,
            },
        };

        Self::resolve(file.unwrap_or_default(), overrides)
    }

    /// Applies overrides and defaults on top of a parsed config file
    pub fn resolve(file: ConfigFile, overrides: &Overrides) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let page_size = overrides
            .page_size
            .or(file.page_size)
            .unwrap_or(defaults.page_size);
        if page_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "page_size",
                reason: "must be at least 1".to_string(),
            });
        }

        let base_url = overrides
            .base_url
            .clone()
            .or(file.base_url)
            .unwrap_or(defaults.base_url);
        if base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "base_url",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(Self {
            base_url,
            page_size,
            placeholder_image: file
                .placeholder_image
                .unwrap_or(defaults.placeholder_image),
            timeout: file.timeout_secs.map(Duration::from_secs),
            log_filter: file.log_filter,
        })
    }
}

/// Reads and parses a config file
fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseFailed {
        path: path.to_path_buf(),
        source: e,
    })
}
