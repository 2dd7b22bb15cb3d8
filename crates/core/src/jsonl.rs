// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSONL (JSON Lines) file utilities.
//!
//! Records are stored one JSON object per line. Whole-file rewrites go
//! through a temporary sibling file that is fsynced and renamed into place,
//! so a crash mid-write leaves either the old or the new content.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Error, Result};

/// Reads all records from a JSONL file.
///
/// Skips empty lines and returns an empty vec if the file doesn't exist.
pub fn read_all<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let reader = BufReader::new(file);
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: T = serde_json::from_str(&line).map_err(|e| {
            Error::CorruptedData(format!("{} line {}: {}", path.display(), index + 1, e))
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Atomically replaces the file with the given records.
pub fn write_atomic<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let mut content = Vec::new();
    for record in records {
        serde_json::to_writer(&mut content, record)?;
        content.push(b'\n');
    }
    write_bytes_atomic(path, &content)
}

/// Atomically replaces the file with the given bytes (write temp, fsync,
/// rename).
pub fn write_bytes_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let tmp = temp_path(path);

    // Any failure leaves the target untouched and the temp file removed
    if let Err(e) = write_file(&tmp, content).and_then(|()| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }

    sync_parent(path);
    Ok(())
}

fn write_file(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(content)?;
    writer.flush()?;
    writer.get_ref().sync_all()
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

// Best effort: persist the rename itself. Not supported on every platform.
fn sync_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }
}

#[cfg(test)]
#[path = "jsonl_tests.rs"]
mod tests;
