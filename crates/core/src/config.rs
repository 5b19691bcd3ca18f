// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Watch configuration
//!
//! Loaded from TOML; every field is optional and falls back to the defaults
//! below.
//!
//! ```toml
//! volumes = ["C:"]
//! max_batch_bytes = 65536
//! start = "next"
//! idle_delay = "100ms"
//! batch_delay = "10ms"
//!
//! [versions]
//! min = 3
//! max = 4
//!
//! [recovery]
//! initial_delay = "500ms"
//! max_delay = "30s"
//! multiplier = 2
//! ```

use crate::record::VersionWindow;
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const MIN_BATCH_BYTES: usize = 4 * 1024;
pub const MAX_BATCH_BYTES: usize = 16 * 1024 * 1024;

/// Errors from loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Where the first read of a fresh session starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartAt {
    /// Only changes made from now on
    #[default]
    Next,
    /// Everything the journal still retains
    First,
}

/// Settings for one or more volume monitors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatchConfig {
    /// Volume designators to watch, e.g. `C:`
    pub volumes: Vec<String>,
    /// Size of the reusable read buffer
    pub max_batch_bytes: usize,
    pub start: StartAt,
    /// Only report changes once the file handle is closed
    pub return_only_on_close: bool,
    /// Pause after a read that returned no records
    #[serde(with = "humantime_serde")]
    pub idle_delay: Duration,
    /// Pause after a read that returned records
    #[serde(with = "humantime_serde")]
    pub batch_delay: Duration,
    pub versions: VersionWindow,
    /// Short-lived read failures
    pub transient: RetryPolicy,
    /// Re-querying the journal after invalidation
    pub recovery: RetryPolicy,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            volumes: vec!["C:".to_string()],
            max_batch_bytes: 64 * 1024,
            start: StartAt::Next,
            return_only_on_close: false,
            idle_delay: Duration::from_millis(100),
            batch_delay: Duration::from_millis(10),
            versions: VersionWindow::default(),
            transient: RetryPolicy::fixed(Duration::from_millis(500)),
            recovery: RetryPolicy::exponential(
                Duration::from_millis(500),
                Duration::from_secs(30),
            ),
        }
    }
}

impl WatchConfig {
    /// Read, parse and validate a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.versions.within(VersionWindow::KNOWN) {
            return Err(ConfigError::Invalid(format!(
                "version window {} must lie within {}",
                self.versions,
                VersionWindow::KNOWN
            )));
        }
        if !(MIN_BATCH_BYTES..=MAX_BATCH_BYTES).contains(&self.max_batch_bytes) {
            return Err(ConfigError::Invalid(format!(
                "max_batch_bytes {} must be between {} and {}",
                self.max_batch_bytes, MIN_BATCH_BYTES, MAX_BATCH_BYTES
            )));
        }
        if self.idle_delay.is_zero() {
            return Err(ConfigError::Invalid("idle_delay must be greater than zero".to_string()));
        }
        if self.volumes.iter().any(|v| v.trim().is_empty()) {
            return Err(ConfigError::Invalid("volume names must not be empty".to_string()));
        }
        validate_policy("transient", &self.transient)?;
        validate_policy("recovery", &self.recovery)?;
        Ok(())
    }
}

fn validate_policy(name: &str, policy: &RetryPolicy) -> Result<(), ConfigError> {
    if policy.multiplier == 0 {
        return Err(ConfigError::Invalid(format!(
            "{}.multiplier must be at least 1",
            name
        )));
    }
    if policy.initial_delay.is_zero() {
        return Err(ConfigError::Invalid(format!(
            "{}.initial_delay must be greater than zero",
            name
        )));
    }
    if policy.initial_delay > policy.max_delay {
        return Err(ConfigError::Invalid(format!(
            "{}.initial_delay exceeds {}.max_delay",
            name, name
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
