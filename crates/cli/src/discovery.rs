// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Locating the configuration file

use crate::error::JwError;
use jw_core::WatchConfig;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable naming a configuration file
pub const CONFIG_ENV: &str = "JWATCH_CONFIG";

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Flag(PathBuf),
    Env(PathBuf),
    UserDir(PathBuf),
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Flag(path) | ConfigSource::Env(path) | ConfigSource::UserDir(path) => {
                Some(path)
            }
            ConfigSource::Defaults => None,
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Flag(path) => write!(f, "{} (--config)", path.display()),
            ConfigSource::Env(path) => write!(f, "{} (${})", path.display(), CONFIG_ENV),
            ConfigSource::UserDir(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults => write!(f, "built-in defaults"),
        }
    }
}

/// Pick the configuration source.
///
/// An explicit path wins, then the environment; the per-user file is only
/// used when it exists.
pub fn locate(
    explicit: Option<&Path>,
    env: Option<OsString>,
    config_dir: Option<PathBuf>,
) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Flag(path.to_path_buf());
    }
    if let Some(value) = env.filter(|v| !v.is_empty()) {
        return ConfigSource::Env(PathBuf::from(value));
    }
    match config_dir.map(|dir| dir.join("jwatch").join("config.toml")) {
        Some(path) if path.is_file() => ConfigSource::UserDir(path),
        _ => ConfigSource::Defaults,
    }
}

/// Load and validate the configuration for this process
pub fn load_config(explicit: Option<&Path>) -> Result<(WatchConfig, ConfigSource), JwError> {
    let source = locate(explicit, std::env::var_os(CONFIG_ENV), dirs::config_dir());
    tracing::debug!(%source, "configuration source");

    let config = match source.path() {
        Some(path) => {
            WatchConfig::load(path).map_err(|e| JwError::config_invalid(Some(path), e))?
        }
        None => WatchConfig::default(),
    };
    Ok((config, source))
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
