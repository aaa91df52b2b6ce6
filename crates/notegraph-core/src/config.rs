//! Engine configuration.
//!
//! Follows a builder pattern with validation. Every instance is owned by the
//! caller and passed to the engine explicitly; nothing here is global.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default time-to-live for cached per-document anchors
pub const DEFAULT_ANCHOR_CACHE_TTL_MS: u64 = 5_000;
/// Default block preview length, in characters
pub const DEFAULT_BLOCK_PREVIEW_LEN: usize = 100;
/// Names shorter than this never produce unlinked mentions
pub const DEFAULT_MIN_UNLINKED_NAME_LEN: usize = 2;
/// Default ceiling for files read from disk (5 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Configuration for one engine instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How long parsed anchors for a path stay valid
    pub anchor_cache_ttl_ms: u64,
    /// Block preview truncation, in characters
    pub block_preview_len: usize,
    /// Minimum display-name length for the unlinked-mention scan
    pub min_unlinked_name_len: usize,
    /// Files above this size are refused by the filesystem content source
    pub max_file_size: u64,
    /// Whether the disk scanner descends into dot-files and dot-directories
    pub include_hidden: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            anchor_cache_ttl_ms: DEFAULT_ANCHOR_CACHE_TTL_MS,
            block_preview_len: DEFAULT_BLOCK_PREVIEW_LEN,
            min_unlinked_name_len: DEFAULT_MIN_UNLINKED_NAME_LEN,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            include_hidden: false,
        }
    }
}

impl EngineConfig {
    /// Start a builder from the defaults
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Anchor cache TTL as a `Duration`
    pub fn anchor_cache_ttl(&self) -> Duration {
        Duration::from_millis(self.anchor_cache_ttl_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.block_preview_len == 0 {
            return Err(Error::config_error("block_preview_len must be positive"));
        }
        if self.min_unlinked_name_len == 0 {
            return Err(Error::config_error(
                "min_unlinked_name_len must be at least 1",
            ));
        }
        if self.max_file_size == 0 {
            return Err(Error::config_error("max_file_size must be positive"));
        }
        Ok(())
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config_error(format!("Invalid engine configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file. A missing file yields the defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config_error(format!(
                "Failed to load configuration from {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml_str(&content)
    }
}

/// Builder for EngineConfig
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Set the anchor cache TTL
    pub fn anchor_cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.anchor_cache_ttl_ms = ttl.as_millis() as u64;
        self
    }

    /// Set the block preview length
    pub fn block_preview_len(mut self, len: usize) -> Self {
        self.config.block_preview_len = len;
        self
    }

    /// Set the minimum name length for unlinked mentions
    pub fn min_unlinked_name_len(mut self, len: usize) -> Self {
        self.config.min_unlinked_name_len = len;
        self
    }

    /// Set the maximum readable file size
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.config.max_file_size = bytes;
        self
    }

    /// Include hidden entries when scanning
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.config.include_hidden = include;
        self
    }

    /// Build and validate
    pub fn build(self) -> Result<EngineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
