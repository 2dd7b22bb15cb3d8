// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

pub fn shelf() -> Command {
    let mut cmd = cargo_bin_cmd!("shelf");
    cmd.env_remove("SHELF_LOG");
    cmd
}

/// Helper to create an initialized temp directory (no probe, always online)
pub fn init_temp() -> TempDir {
    let temp = TempDir::new().unwrap();
    shelf()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Helper to run a command in the temp directory and assert success.
pub fn run_ok(temp: &TempDir, args: &[&str]) -> String {
    let output = shelf()
        .args(args)
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "shelf {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Record files written to a collection of the default document store.
pub fn remote_records(temp: &TempDir, collection: &str) -> Vec<PathBuf> {
    let dir = temp.path().join(".shelf").join("remote").join(collection);
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
        Err(_) => Vec::new(),
    }
}

/// Parses JSON printed by a `-o json` command.
pub fn json_output(temp: &TempDir, args: &[&str]) -> serde_json::Value {
    serde_json::from_str(&run_ok(temp, args)).unwrap()
}
