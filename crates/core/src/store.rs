// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable storage for the pending operation queue.
//!
//! A store persists the whole ordered queue as one snapshot per call. It
//! holds no business logic: ordering, validation and retry bookkeeping are
//! the mutation queue's job.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use fs2::FileExt;

use crate::error::{Error, Result};
use crate::jsonl;
use crate::op::Operation;

/// Storage key of the queue snapshot.
pub const QUEUE_KEY: &str = "offline_sync_queue";
/// Storage key of the last full-drain timestamp (diagnostic only).
pub const LAST_SYNC_KEY: &str = "last_sync_timestamp";

const LOCK_FILE_NAME: &str = "queue.lock";

/// Persistence backend for the mutation queue.
pub trait QueueStore: Send {
    /// Loads the persisted queue in insertion order.
    fn load(&self) -> Result<Vec<Operation>>;

    /// Replaces the persisted queue. Must be atomic per call.
    fn save(&mut self, ops: &[Operation]) -> Result<()>;

    /// Loads the time of the last pass that left the queue empty.
    fn load_last_sync(&self) -> Result<Option<DateTime<Utc>>>;

    /// Records the time of a pass that left the queue empty.
    fn save_last_sync(&mut self, at: DateTime<Utc>) -> Result<()>;
}

/// Directory-backed store using a JSONL snapshot file.
///
/// Holds an exclusive lock on the directory for its lifetime so a single
/// process owns the queue.
pub struct JsonlQueueStore {
    dir: PathBuf,
    _lock: File,
}

impl JsonlQueueStore {
    /// Opens (creating if needed) the store in the given directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Locked`] if another process holds the queue.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let lock_path = dir.join(LOCK_FILE_NAME);
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;
        lock.try_lock_exclusive()
            .map_err(|_| Error::Locked(lock_path.display().to_string()))?;

        Ok(JsonlQueueStore { dir, _lock: lock })
    }

    /// Path of the queue snapshot file.
    pub fn queue_path(&self) -> PathBuf {
        self.dir.join(format!("{QUEUE_KEY}.jsonl"))
    }

    /// Path of the last-sync timestamp file.
    pub fn last_sync_path(&self) -> PathBuf {
        self.dir.join(LAST_SYNC_KEY)
    }
}

impl QueueStore for JsonlQueueStore {
    fn load(&self) -> Result<Vec<Operation>> {
        jsonl::read_all(&self.queue_path())
    }

    fn save(&mut self, ops: &[Operation]) -> Result<()> {
        jsonl::write_atomic(&self.queue_path(), ops)
    }

    fn load_last_sync(&self) -> Result<Option<DateTime<Utc>>> {
        let content = match fs::read_to_string(self.last_sync_path()) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        DateTime::parse_from_rfc3339(trimmed)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| Error::CorruptedData(format!("{LAST_SYNC_KEY}: {e}")))
    }

    fn save_last_sync(&mut self, at: DateTime<Utc>) -> Result<()> {
        jsonl::write_bytes_atomic(&self.last_sync_path(), at.to_rfc3339().as_bytes())
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    ops: Vec<Operation>,
    last_sync: Option<DateTime<Utc>>,
    fail_saves: bool,
    saves: usize,
}

/// In-memory store. Clones share the same contents, so a test can keep a
/// handle to inspect what the queue persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryQueueStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryQueueStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given operations.
    pub fn with_ops(ops: Vec<Operation>) -> Self {
        let store = Self::new();
        store.lock().ops = ops;
        store
    }

    /// Makes subsequent saves fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.lock().fail_saves = fail;
    }

    /// Returns the persisted operations.
    pub fn contents(&self) -> Vec<Operation> {
        self.lock().ops.clone()
    }

    /// Returns the number of successful queue saves.
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl QueueStore for MemoryQueueStore {
    fn load(&self) -> Result<Vec<Operation>> {
        Ok(self.lock().ops.clone())
    }

    fn save(&mut self, ops: &[Operation]) -> Result<()> {
        let mut state = self.lock();
        if state.fail_saves {
            return Err(Error::InjectedFailure("injected save failure".to_string()));
        }
        state.ops = ops.to_vec();
        state.saves += 1;
        Ok(())
    }

    fn load_last_sync(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.lock().last_sync)
    }

    fn save_last_sync(&mut self, at: DateTime<Utc>) -> Result<()> {
        let mut state = self.lock();
        if state.fail_saves {
            return Err(Error::InjectedFailure("injected save failure".to_string()));
        }
        state.last_sync = Some(at);
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
