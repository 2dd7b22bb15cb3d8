// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod clear;
pub mod enqueue;
pub mod init;
pub mod queue;
pub mod status;
pub mod sync;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use shelf_core::{JsonlQueueStore, OpIdGenerator, Payload};
use tracing::debug;

use crate::config::{find_work_dir, queue_dir, remote_dir, Config};
use crate::error::{Error, Result};
use crate::sync::{Connectivity, DirectoryRemote, ProcessorConfig, SyncEngine, TcpProbe};

/// An initialized project: its `.shelf` directory and config.
#[derive(Debug, Clone)]
pub struct Project {
    pub work_dir: PathBuf,
    pub config: Config,
}

impl Project {
    /// Finds the project by walking up from the current directory.
    pub fn find() -> Result<Self> {
        Self::at(find_work_dir()?)
    }

    /// Loads the project whose `.shelf` directory is given.
    pub fn at(work_dir: impl AsRef<Path>) -> Result<Self> {
        let work_dir = work_dir.as_ref().to_path_buf();
        if !work_dir.is_dir() {
            return Err(Error::NotInitialized);
        }
        let config = Config::load(&work_dir)?;
        Ok(Project { work_dir, config })
    }

    pub fn remote_dir(&self) -> PathBuf {
        remote_dir(&self.work_dir, &self.config)
    }

    /// The configured probe, if any.
    pub fn probe(&self) -> Option<TcpProbe> {
        let connectivity = &self.config.connectivity;
        connectivity.probe.as_ref().map(|target| {
            TcpProbe::new(target.clone(), connectivity.interval(), connectivity.timeout())
        })
    }

    /// Checks reachability once. Without a probe the remote is assumed reachable.
    pub async fn check_online(&self) -> bool {
        match self.probe() {
            Some(probe) => probe.check().await,
            None => true,
        }
    }

    /// Opens the engine over this project's queue and document store.
    ///
    /// Takes the queue lock for the lifetime of the engine.
    pub fn open_engine(&self, online: bool) -> Result<SyncEngine> {
        let store = JsonlQueueStore::open(queue_dir(&self.work_dir))?;
        let remote = Arc::new(DirectoryRemote::new(self.remote_dir()));
        let id_gen = match self.config.sync.node_id {
            Some(node) => OpIdGenerator::new(node),
            None => OpIdGenerator::random(),
        };
        debug!(node = id_gen.node(), online, "opening engine");
        SyncEngine::new(
            Box::new(store),
            remote,
            Connectivity::new(online),
            id_gen,
            ProcessorConfig::from(&self.config.sync),
        )
    }
}

/// Parses a JSON object argument.
pub fn parse_payload(json: &str) -> Result<Payload> {
    match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(Error::InvalidPayload {
            reason: format!("expected an object, got {}", json_kind(&other)),
        }),
        Err(e) => Err(Error::InvalidPayload {
            reason: e.to_string(),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Prints a value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
