//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\unitag\config.toml
//! - macOS: ~/Library/Application Support/unitag/config.toml
//! - Linux: ~/.config/unitag/config.toml
//!
//! The file only supplies defaults. Command-line flags win over it.
//!
//! ```toml
//! [read]
//! normalized_rating_max_value = 100
//!
//! [write]
//! id3v2_version = "2.4"
//! default_format = "VORBIS"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::metadata::{DEFAULT_RATING_MAX, ReadOptions, UpdateOptions};
use crate::model::{Id3v2Version, TagFormat};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Defaults for read operations
    pub read: ReadConfig,

    /// Defaults for write operations
    pub write: WriteConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadConfig {
    /// Caller rating scale for reads
    pub normalized_rating_max_value: Option<u32>,
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self {
            normalized_rating_max_value: Some(DEFAULT_RATING_MAX),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteConfig {
    /// Caller rating scale for writes
    pub normalized_rating_max_value: Option<u32>,

    /// ID3v2 revision for new and rewritten tags
    pub id3v2_version: Id3v2Version,

    /// Target format when none is given (unset = container default)
    pub default_format: Option<TagFormat>,
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self {
            normalized_rating_max_value: Some(DEFAULT_RATING_MAX),
            id3v2_version: Id3v2Version::default(),
            default_format: None,
        }
    }
}

impl From<&Config> for ReadOptions {
    fn from(config: &Config) -> Self {
        Self {
            normalized_rating_max_value: config.read.normalized_rating_max_value,
        }
    }
}

impl From<&Config> for UpdateOptions {
    fn from(config: &Config) -> Self {
        Self {
            format: config.write.default_format,
            normalized_rating_max_value: config.write.normalized_rating_max_value,
            id3v2_version: config.write.id3v2_version,
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("unitag"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if the file doesn't exist or can't be parsed.
pub fn load() -> Config {
    match config_path() {
        Some(path) => load_from(&path),
        None => {
            tracing::warn!("Could not determine config directory, using defaults");
            Config::default()
        }
    }
}

/// Load configuration from an explicit path
///
/// Logs problems but doesn't fail; a usable config is always returned.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::debug!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to the default location
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)
}

/// Save configuration to `path`
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
