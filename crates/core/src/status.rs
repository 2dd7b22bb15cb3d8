// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Derived sync status.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sync state shown to the user. Never stored; always derived from the
/// online flag, the draining flag and the pending count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// No connectivity; writes accumulate locally.
    Offline,
    /// A drain pass is in progress.
    Syncing,
    /// Online with operations waiting for the next drain.
    Pending,
    /// Online and nothing left to send.
    Synced,
}

impl SyncStatus {
    /// Derives the status from its inputs.
    pub fn derive(online: bool, draining: bool, pending: usize) -> Self {
        if !online {
            SyncStatus::Offline
        } else if draining {
            SyncStatus::Syncing
        } else if pending > 0 {
            SyncStatus::Pending
        } else {
            SyncStatus::Synced
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SyncStatus::Offline => "offline",
            SyncStatus::Syncing => "syncing",
            SyncStatus::Pending => "pending",
            SyncStatus::Synced => "synced",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
