// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Document store kept in a directory tree.
//!
//! Each record is a JSON file at `<root>/<collection>/<id>.json`. The root can
//! live on a network share or a synced folder; reachability is tracked
//! separately by the connectivity probe.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use sha2::{Digest, Sha256};
use shelf_core::product::{self, PRODUCTS_COLLECTION};
use shelf_core::{Payload, REMOTE_ID_KEY};
use tracing::debug;

use super::remote::{RemoteError, RemoteFuture, RemoteResult, RemoteStore};

const SYNCED_KEY: &str = "_synced";
const CREATED_AT_KEY: &str = "_createdAt";
const UPDATED_AT_KEY: &str = "_updatedAt";

/// Remote store rooted at a directory.
pub struct DirectoryRemote {
    root: PathBuf,
    counter: AtomicU64,
}

impl DirectoryRemote {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectoryRemote {
            root: root.into(),
            counter: AtomicU64::new(0),
        }
    }

    /// Path of a record file.
    pub fn record_path(&self, collection: &str, id: &str) -> RemoteResult<PathBuf> {
        check_segment("collection", collection)?;
        check_segment("id", id)?;
        Ok(self.root.join(collection).join(format!("{id}.json")))
    }

    /// Reads a stored record.
    pub async fn get(&self, collection: &str, id: &str) -> RemoteResult<Payload> {
        let path = self.record_path(collection, id)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(not_found(collection, id));
            }
            Err(e) => return Err(transient(&path, e)),
        };
        match serde_json::from_slice(&bytes) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(RemoteError::Transient(format!(
                "{}: record is not an object",
                path.display()
            ))),
            Err(e) => Err(RemoteError::Transient(format!("{}: {e}", path.display()))),
        }
    }

    fn generate_id(&self, collection: &str, payload: &Payload) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let input = format!(
            "{collection}{}{}{n}",
            Value::Object(payload.clone()),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        );
        let hash = Sha256::digest(input.as_bytes());
        hex::encode(&hash[..8])
    }

    async fn do_create(&self, collection: &str, payload: &Payload) -> RemoteResult<String> {
        check_segment("collection", collection)?;
        check_schema(collection, payload, false)?;
        let dir = self.root.join(collection);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| transient(&dir, e))?;

        let id = loop {
            let candidate = self.generate_id(collection, payload);
            let path = self.record_path(collection, &candidate)?;
            if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
                break candidate;
            }
        };

        let now = timestamp();
        let mut record = strip_id(payload);
        record.insert(SYNCED_KEY.to_string(), Value::Bool(true));
        record.insert(CREATED_AT_KEY.to_string(), Value::String(now.clone()));
        record.insert(UPDATED_AT_KEY.to_string(), Value::String(now));
        self.write(collection, &id, &record).await?;
        debug!(collection, id, "created record");
        Ok(id)
    }

    async fn do_update(&self, collection: &str, id: &str, payload: &Payload) -> RemoteResult<()> {
        check_schema(collection, payload, true)?;
        let mut record = self.get(collection, id).await?;
        for (key, value) in strip_id(payload) {
            record.insert(key, value);
        }
        record.insert(SYNCED_KEY.to_string(), Value::Bool(true));
        record.insert(UPDATED_AT_KEY.to_string(), Value::String(timestamp()));
        self.write(collection, id, &record).await?;
        debug!(collection, id, "updated record");
        Ok(())
    }

    async fn do_delete(&self, collection: &str, id: &str) -> RemoteResult<()> {
        let path = self.record_path(collection, id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(collection, id, "deleted record");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(not_found(collection, id)),
            Err(e) => Err(transient(&path, e)),
        }
    }

    async fn write(&self, collection: &str, id: &str, record: &Payload) -> RemoteResult<()> {
        let path = self.record_path(collection, id)?;
        let bytes = serde_json::to_vec_pretty(record)
            .map_err(|e| RemoteError::Permanent(format!("unserializable record: {e}")))?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| transient(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| transient(&path, e))
    }
}

impl RemoteStore for DirectoryRemote {
    fn create<'a>(&'a self, collection: &'a str, payload: &'a Payload) -> RemoteFuture<'a, String> {
        Box::pin(self.do_create(collection, payload))
    }

    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        payload: &'a Payload,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(self.do_update(collection, id, payload))
    }

    fn delete<'a>(&'a self, collection: &'a str, id: &'a str) -> RemoteFuture<'a, ()> {
        Box::pin(self.do_delete(collection, id))
    }
}

fn check_segment(what: &str, value: &str) -> RemoteResult<()> {
    let valid = !value.is_empty()
        && value != "."
        && value != ".."
        && !value.contains(['/', '\\', '\0']);
    if valid {
        Ok(())
    } else {
        Err(RemoteError::Permanent(format!("invalid {what} '{value}'")))
    }
}

fn check_schema(collection: &str, payload: &Payload, partial: bool) -> RemoteResult<()> {
    if collection != PRODUCTS_COLLECTION {
        return Ok(());
    }
    product::validate(payload, partial).map_err(|e| RemoteError::Permanent(e.to_string()))
}

fn strip_id(payload: &Payload) -> Payload {
    let mut record = payload.clone();
    record.remove(REMOTE_ID_KEY);
    record
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn not_found(collection: &str, id: &str) -> RemoteError {
    RemoteError::NotFound {
        collection: collection.to_string(),
        id: id.to_string(),
    }
}

fn transient(path: &Path, err: std::io::Error) -> RemoteError {
    RemoteError::Transient(format!("{}: {err}", path.display()))
}

#[cfg(test)]
#[path = "dir_remote_tests.rs"]
mod tests;
