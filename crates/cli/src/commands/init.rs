// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use crate::config::{init_work_dir, remote_dir, validate_probe, Config};
use crate::error::Result;

pub fn run(remote: Option<String>, probe: Option<String>) -> Result<()> {
    let target = std::env::current_dir()?;
    let work_dir = init_at(&target, remote, probe)?;
    let config = Config::load(&work_dir)?;

    println!("Initialized shelf at {}", work_dir.display());
    println!("Remote: {}", remote_dir(&work_dir, &config).display());
    match &config.connectivity.probe {
        Some(probe) => println!("Probe: {probe}"),
        None => println!("Probe: none (remote assumed reachable)"),
    }
    Ok(())
}

/// Creates `.shelf/` under `target` and returns its path.
pub fn init_at(target: &Path, remote: Option<String>, probe: Option<String>) -> Result<PathBuf> {
    if let Some(probe) = &probe {
        validate_probe(probe)?;
    }
    let mut config = Config::default();
    if let Some(remote) = remote {
        config.remote.path = remote;
    }
    config.connectivity.probe = probe;
    init_work_dir(target, &config)
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
