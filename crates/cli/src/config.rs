// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Project configuration management.
//!
//! Configuration is stored in `.shelf/config.toml` and includes:
//! - `[remote]`: where the document store lives
//! - `[connectivity]`: the optional reachability probe
//! - `[sync]`: retry policy and the operation id node

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

const WORK_DIR_NAME: &str = ".shelf";
const CONFIG_FILE_NAME: &str = "config.toml";
const QUEUE_DIR_NAME: &str = "queue";
const DEFAULT_REMOTE_DIR: &str = "remote";

/// Project configuration stored in `.shelf/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub connectivity: ConnectivityConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Remote document store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Document store root (relative to the project root or absolute).
    #[serde(default = "default_remote_path")]
    pub path: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            path: default_remote_path(),
        }
    }
}

fn default_remote_path() -> String {
    format!("{WORK_DIR_NAME}/{DEFAULT_REMOTE_DIR}")
}

/// Reachability probe configuration.
///
/// Without a probe the engine assumes it is online.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectivityConfig {
    /// `host:port` to connect to, e.g. `example.com:443`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe: Option<String>,
    /// Probe period in milliseconds (default: 5000).
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Connect timeout in milliseconds (default: 2000).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        ConnectivityConfig {
            probe: None,
            interval_ms: default_interval_ms(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_interval_ms() -> u64 {
    5000
}

fn default_timeout_ms() -> u64 {
    2000
}

impl ConnectivityConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Failed attempts before an operation is evicted (default: 3).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Evict operations the remote rejects outright on their first failure.
    #[serde(default)]
    pub evict_permanent: bool,
    /// Node component of operation ids. Random per process when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<u32>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            max_attempts: default_max_attempts(),
            evict_permanent: false,
            node_id: None,
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

impl Config {
    /// Load config from the work directory.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", config_path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the work directory.
    pub fn save(&self, work_dir: &Path) -> Result<()> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        fs::write(config_path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.sync.max_attempts == 0 {
            return Err(Error::Config(
                "sync.max_attempts must be at least 1".to_string(),
            ));
        }
        if let Some(probe) = &self.connectivity.probe {
            validate_probe(probe)?;
        }
        if self.connectivity.interval_ms == 0 {
            return Err(Error::Config(
                "connectivity.interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Checks that a probe target looks like `host:port`.
pub fn validate_probe(probe: &str) -> Result<()> {
    if probe.parse::<SocketAddr>().is_ok() {
        return Ok(());
    }
    match probe.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => Ok(()),
        _ => Err(Error::InvalidProbe(probe.to_string())),
    }
}

/// Find the .shelf directory by walking up from the current directory.
pub fn find_work_dir() -> Result<PathBuf> {
    let mut current = std::env::current_dir()?;
    loop {
        let work_dir = current.join(WORK_DIR_NAME);
        if work_dir.is_dir() {
            return Ok(work_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

/// Directory holding the durable queue files.
pub fn queue_dir(work_dir: &Path) -> PathBuf {
    work_dir.join(QUEUE_DIR_NAME)
}

/// Resolve the remote store root from config.
pub fn remote_dir(work_dir: &Path, config: &Config) -> PathBuf {
    let remote = Path::new(&config.remote.path);
    if remote.is_absolute() {
        remote.to_path_buf()
    } else {
        // Relative to the project root
        work_dir.parent().unwrap_or(work_dir).join(remote)
    }
}

/// Initialize a new .shelf directory.
pub fn init_work_dir(path: &Path, config: &Config) -> Result<PathBuf> {
    let work_dir = path.join(WORK_DIR_NAME);

    if work_dir.exists() {
        return Err(Error::AlreadyInitialized(work_dir.display().to_string()));
    }

    config.validate()?;
    fs::create_dir_all(queue_dir(&work_dir))?;
    config.save(&work_dir)?;

    Ok(work_dir)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
