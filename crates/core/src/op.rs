// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pending mutations awaiting remote application.
//!
//! Every local change to a catalog record is represented as an [`Operation`]
//! that sits in the mutation queue until the sync processor has applied it
//! to the remote store (or given up on it). Operations are:
//!
//! - Serializable: persisted in the durable queue snapshot
//! - Ordered: replayed in the order they were enqueued
//! - Self-contained: they carry everything needed to replay the mutation

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::op_id::OpId;

/// Payload key holding the remote record identifier.
pub const REMOTE_ID_KEY: &str = "id";

/// Opaque record data: field name to JSON value.
pub type Payload = Map<String, Value>;

/// Kind of mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    Create,
    Update,
    Delete,
}

impl OpKind {
    /// Returns true if the mutation targets an existing remote record.
    pub fn requires_remote_id(self) -> bool {
        matches!(self, OpKind::Update | OpKind::Delete)
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OpKind::Create => "create",
            OpKind::Update => "update",
            OpKind::Delete => "delete",
        };
        write!(f, "{s}")
    }
}

/// A single pending mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Unique identifier, also the enqueue order.
    pub id: OpId,
    pub kind: OpKind,
    /// Target collection in the remote store.
    pub collection: String,
    pub payload: Payload,
    pub enqueued_at: DateTime<Utc>,
    /// Failed remote attempts so far. Only ever incremented.
    #[serde(default)]
    pub retry_count: u32,
}

impl Operation {
    /// Creates a validated operation with a zero retry count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the collection is blank, or if an
    /// update/delete payload lacks a non-empty remote id under
    /// [`REMOTE_ID_KEY`].
    pub fn new(
        id: OpId,
        kind: OpKind,
        collection: impl Into<String>,
        payload: Payload,
        enqueued_at: DateTime<Utc>,
    ) -> Result<Self> {
        let op = Operation {
            id,
            kind,
            collection: collection.into(),
            payload,
            enqueued_at,
            retry_count: 0,
        };
        op.validate()?;
        Ok(op)
    }

    /// Checks the operation's structural invariants.
    pub fn validate(&self) -> Result<()> {
        if self.collection.trim().is_empty() {
            return Err(Error::Validation("collection must not be empty".to_string()));
        }
        if self.kind.requires_remote_id() && self.remote_id().is_none() {
            return Err(Error::Validation(format!(
                "{} on '{}' requires a remote id\n  hint: include a non-empty string \"{}\" field in the payload",
                self.kind, self.collection, REMOTE_ID_KEY
            )));
        }
        Ok(())
    }

    /// Returns the remote record id carried by the payload, if any.
    pub fn remote_id(&self) -> Option<&str> {
        remote_id_of(&self.payload)
    }
}

/// Extracts a non-empty remote id from a payload.
pub fn remote_id_of(payload: &Payload) -> Option<&str> {
    payload
        .get(REMOTE_ID_KEY)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|id| !id.is_empty())
}

#[cfg(test)]
#[path = "op_tests.rs"]
mod tests;
