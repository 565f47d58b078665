//! Configuration system for objpath.
//!
//! This module provides the engine configuration with sensible defaults and
//! support for serialization/deserialization via serde. Configuration can be
//! loaded from TOML files.
//!
//! # Example
//!
//! ```
//! use objpath::config::Config;
//!
//! // Use default configuration
//! let config = Config::default();
//! assert_eq!(config.max_segments, 64);
//! assert!(!config.unknown_field_as_null);
//!
//! // Create custom configuration
//! let custom = Config {
//!     unknown_field_as_null: true,
//!     ..Config::default()
//! };
//! assert_eq!(custom.path_cache_size, 256);
//! ```

use crate::path::parser::DEFAULT_MAX_SEGMENTS;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for an [`Extractor`](crate::engine::Extractor).
///
/// # Fields
///
/// * `max_segments` - Longest path accepted by the compiler (default: 64)
/// * `unknown_field_as_null` - Resolve missing members as null instead of failing (default: false)
/// * `path_cache_size` - Compiled paths kept for reuse, 0 disables caching (default: 256)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Longest path accepted by the compiler
    #[serde(default = "default_max_segments")]
    pub max_segments: usize,

    /// Resolve missing members as null instead of failing
    #[serde(default)]
    pub unknown_field_as_null: bool,

    /// Compiled paths kept for reuse; 0 disables caching
    #[serde(default = "default_path_cache_size")]
    pub path_cache_size: usize,
}

fn default_max_segments() -> usize {
    DEFAULT_MAX_SEGMENTS
}

fn default_path_cache_size() -> usize {
    256
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_segments: default_max_segments(),
            unknown_field_as_null: false,
            path_cache_size: default_path_cache_size(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/objpath/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("objpath");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        let config_path = match Self::config_path() {
            Some(path) => path,
            None => return Self::default(),
        };

        if !config_path.exists() {
            return Self::default();
        }

        match Self::load_from(&config_path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring {}: {:#}", config_path.display(), e);
                Self::default()
            }
        }
    }

    /// Loads configuration from a specific file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from TOML text; missing keys take their defaults.
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        toml::from_str(contents).context("Failed to parse config")
    }

    /// Saves configuration to the default config file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(config_path)
    }

    /// Saves configuration to a specific file, creating parent directories.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml_str("unknown_field_as_null = true").unwrap();
        assert!(config.unknown_field_as_null);
        assert_eq!(config.max_segments, 64);
        assert_eq!(config.path_cache_size, 256);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(Config::from_toml_str("max_segments = \"lots\"").is_err());
    }
}
