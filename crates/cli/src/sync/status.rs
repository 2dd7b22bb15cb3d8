// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! User-facing sync status.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use shelf_core::SyncStatus;

use super::processor::{DrainOutcome, SkipReason, SyncProcessor};

/// Snapshot of everything a status indicator needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncReport {
    pub status: SyncStatus,
    pub online: bool,
    pub draining: bool,
    pub pending: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<DateTime<Utc>>,
    /// Last queue persistence failure, if the queue is not durable right now.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<String>,
}

/// Read-only view over connectivity, the queue and the processor.
#[derive(Clone)]
pub struct SyncStatusAggregator {
    processor: Arc<SyncProcessor>,
}

impl SyncStatusAggregator {
    pub fn new(processor: Arc<SyncProcessor>) -> Self {
        SyncStatusAggregator { processor }
    }

    pub fn status(&self) -> SyncStatus {
        let queue = self.processor.queue();
        SyncStatus::derive(
            queue.connectivity().is_online(),
            self.processor.is_draining(),
            queue.len(),
        )
    }

    pub fn pending_count(&self) -> usize {
        self.processor.queue().len()
    }

    /// Drains now if online (manual "sync now").
    pub async fn retry(&self) -> DrainOutcome {
        if !self.processor.queue().connectivity().is_online() {
            return DrainOutcome::Skipped(SkipReason::Offline);
        }
        self.processor.drain().await
    }

    pub async fn report(&self) -> SyncReport {
        let queue = self.processor.queue();
        let online = queue.connectivity().is_online();
        let draining = self.processor.is_draining();
        let pending = queue.len();
        SyncReport {
            status: SyncStatus::derive(online, draining, pending),
            online,
            draining,
            pending,
            last_sync: queue.last_sync().await,
            degraded: queue.degraded(),
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
