// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Change notifications published by the sync engine.

use std::collections::BTreeSet;

use serde::Serialize;
use shelf_core::{OpId, OpKind};

/// Event broadcast to subscribers of the mutation queue.
///
/// Receivers that lag behind lose the oldest events; every event carries
/// enough context to refresh from [`super::SyncStatusAggregator::report`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SyncEvent {
    Enqueued {
        id: OpId,
        kind: OpKind,
        collection: String,
        pending: usize,
    },
    Applied {
        id: OpId,
        kind: OpKind,
        collection: String,
        /// Id assigned by the remote store on create.
        #[serde(skip_serializing_if = "Option::is_none")]
        remote_id: Option<String>,
    },
    Retried {
        id: OpId,
        retry_count: u32,
        error: String,
    },
    /// The operation was evicted and will never be applied.
    PermanentFailure {
        id: OpId,
        kind: OpKind,
        collection: String,
        retry_count: u32,
        error: String,
    },
    DrainStarted {
        pending: usize,
    },
    DrainCompleted(DrainReport),
    /// Collections touched by a drain pass; cached reads should be refreshed.
    CollectionsInvalidated {
        collections: BTreeSet<String>,
    },
    PersistenceDegraded {
        error: String,
    },
    Cleared,
}

/// An operation dropped from the queue during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Eviction {
    pub id: OpId,
    pub kind: OpKind,
    pub collection: String,
    pub retry_count: u32,
    pub error: String,
}

/// Per-pass counters.
///
/// Evictions are listed in full so callers can surface them even when the
/// matching [`SyncEvent::PermanentFailure`] events were missed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DrainReport {
    pub applied: usize,
    pub retried: usize,
    pub evicted: usize,
    /// Steps whose queue write failed; those operations stay as they were.
    pub skipped_persistence: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub evictions: Vec<Eviction>,
}

impl DrainReport {
    /// Returns true if every attempted operation was applied.
    pub fn is_clean(&self) -> bool {
        self.retried == 0 && self.evicted == 0 && self.skipped_persistence == 0
    }
}
