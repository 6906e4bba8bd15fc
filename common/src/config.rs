//! Stream configuration.
//!
//! Values come from, in increasing priority: compiled defaults, a TOML file, and
//! `RAWIO_*` environment variables.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default chunk size used by length-less reads.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 8192;

/// Environment variable overriding [`StreamConfig::read_chunk_size`].
pub const READ_CHUNK_SIZE_ENV: &str = "RAWIO_READ_CHUNK_SIZE";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StreamConfig {
    /// Number of bytes requested per system call when reading a stream to its end.
    pub read_chunk_size: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self { read_chunk_size: DEFAULT_READ_CHUNK_SIZE }
    }
}

impl StreamConfig {
    /// Parses a configuration from a TOML string. Missing fields take their defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str).context("Invalid stream configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file and applies environment overrides on top of it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let mut config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env_overrides()?;

        tracing::debug!("Loaded stream configuration from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// The default configuration with environment overrides applied.
    ///
    /// An invalid override is logged and ignored, leaving the defaults in place.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Err(e) = config.apply_env_overrides() {
            tracing::warn!("Ignoring stream configuration from the environment: {:#}", e);
            return Self::default();
        }
        config
    }

    /// Overrides fields from `RAWIO_*` environment variables, when set.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(READ_CHUNK_SIZE_ENV) {
            self.read_chunk_size = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid {READ_CHUNK_SIZE_ENV} value: {value:?}"))?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.read_chunk_size == 0 {
            anyhow::bail!("read_chunk_size must be greater than or equal to 1");
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize stream configuration")
    }
}
