// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Drains the mutation queue into the remote store.
//!
//! A pass works from a snapshot taken when it starts, applies operations in
//! enqueue order and never stops early: a failing operation is retried on a
//! later pass (or evicted once it runs out of attempts) while the rest of
//! the queue keeps flowing.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use shelf_core::{OpKind, Operation};
use tracing::{debug, error, info, warn};

use super::event::{DrainReport, Eviction, SyncEvent};
use super::queue::MutationQueue;
use super::remote::{RemoteError, RemoteStore};

/// Retry policy for the processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessorConfig {
    /// Failed attempts after which an operation is evicted.
    pub max_attempts: u32,
    /// Evict on the first [`RemoteError::Permanent`] instead of retrying.
    pub evict_permanent: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        ProcessorConfig {
            max_attempts: 3,
            evict_permanent: false,
        }
    }
}

impl From<&crate::config::SyncConfig> for ProcessorConfig {
    fn from(config: &crate::config::SyncConfig) -> Self {
        ProcessorConfig {
            max_attempts: config.max_attempts.max(1),
            evict_permanent: config.evict_permanent,
        }
    }
}

/// Why a drain did not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Offline,
    Empty,
    AlreadyDraining,
}

/// Result of a [`SyncProcessor::drain`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrainOutcome {
    Completed(DrainReport),
    Skipped(SkipReason),
}

/// Releases the draining flag when a pass ends, even on panic.
struct DrainGuard<'a>(&'a AtomicBool);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

enum Step {
    Applied(Option<String>),
    Failed(RemoteError),
}

/// Applies queued operations to a remote store.
pub struct SyncProcessor {
    queue: Arc<MutationQueue>,
    remote: Arc<dyn RemoteStore>,
    config: ProcessorConfig,
    draining: AtomicBool,
}

impl SyncProcessor {
    pub fn new(
        queue: Arc<MutationQueue>,
        remote: Arc<dyn RemoteStore>,
        config: ProcessorConfig,
    ) -> Self {
        SyncProcessor {
            queue,
            remote,
            config,
            draining: AtomicBool::new(false),
        }
    }

    pub fn queue(&self) -> &Arc<MutationQueue> {
        &self.queue
    }

    /// Returns true while a pass is running.
    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Acquire)
    }

    /// Runs one pass over the queue.
    ///
    /// Safe to call from any trigger at any time: a call made while another
    /// pass is running returns immediately without doing anything.
    pub async fn drain(&self) -> DrainOutcome {
        if !self.queue.connectivity().is_online() {
            return DrainOutcome::Skipped(SkipReason::Offline);
        }
        if self.queue.is_empty() {
            return DrainOutcome::Skipped(SkipReason::Empty);
        }
        if self
            .draining
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("drain already running");
            return DrainOutcome::Skipped(SkipReason::AlreadyDraining);
        }
        let guard = DrainGuard(&self.draining);

        let ops = self.queue.snapshot().await;
        if ops.is_empty() {
            return DrainOutcome::Skipped(SkipReason::Empty);
        }
        info!(pending = ops.len(), "drain started");
        self.queue.emit(SyncEvent::DrainStarted { pending: ops.len() });

        let mut report = DrainReport::default();
        let mut touched = BTreeSet::new();
        for op in &ops {
            self.process(op, &mut report, &mut touched).await;
        }
        drop(guard);

        if report.is_clean() && self.queue.is_empty() {
            if let Err(e) = self.queue.record_last_sync(Utc::now()).await {
                warn!(error = %e, "could not record last sync time");
            }
        }

        info!(
            applied = report.applied,
            retried = report.retried,
            evicted = report.evicted,
            skipped = report.skipped_persistence,
            "drain completed"
        );
        if !touched.is_empty() {
            self.queue.emit(SyncEvent::CollectionsInvalidated {
                collections: touched,
            });
        }
        self.queue.emit(SyncEvent::DrainCompleted(report.clone()));
        DrainOutcome::Completed(report)
    }

    async fn process(&self, op: &Operation, report: &mut DrainReport, touched: &mut BTreeSet<String>) {
        match self.apply(op).await {
            Step::Applied(remote_id) => {
                debug!(id = %op.id, kind = %op.kind, collection = %op.collection, "applied");
                touched.insert(op.collection.clone());
                if self.remove(op, report).await {
                    report.applied += 1;
                    self.queue.emit(SyncEvent::Applied {
                        id: op.id,
                        kind: op.kind,
                        collection: op.collection.clone(),
                        remote_id,
                    });
                }
            }
            Step::Failed(err) => self.fail(op, err, report).await,
        }
    }

    async fn apply(&self, op: &Operation) -> Step {
        let remote_id = op.remote_id().unwrap_or_default();
        let result = match op.kind {
            OpKind::Create => self
                .remote
                .create(&op.collection, &op.payload)
                .await
                .map(Some),
            OpKind::Update => self
                .remote
                .update(&op.collection, remote_id, &op.payload)
                .await
                .map(|()| None),
            OpKind::Delete => match self.remote.delete(&op.collection, remote_id).await {
                // Already gone is what we wanted
                Err(RemoteError::NotFound { .. }) => Ok(None),
                other => other.map(|()| None),
            },
        };
        match result {
            Ok(id) => Step::Applied(id),
            Err(e) => Step::Failed(e),
        }
    }

    async fn fail(&self, op: &Operation, err: RemoteError, report: &mut DrainReport) {
        let count = match self.queue.mark_retried(op.id).await {
            Ok(Some(count)) => count,
            Ok(None) => return,
            Err(e) => {
                error!(id = %op.id, error = %e, "could not record retry");
                report.skipped_persistence += 1;
                return;
            }
        };

        let permanent = self.config.evict_permanent && !err.is_transient();
        if count < self.config.max_attempts && !permanent {
            warn!(id = %op.id, retry_count = count, error = %err, "operation failed, will retry");
            report.retried += 1;
            self.queue.emit(SyncEvent::Retried {
                id: op.id,
                retry_count: count,
                error: err.to_string(),
            });
            return;
        }

        if self.remove(op, report).await {
            warn!(
                id = %op.id,
                kind = %op.kind,
                collection = %op.collection,
                retry_count = count,
                error = %err,
                "operation evicted"
            );
            let eviction = Eviction {
                id: op.id,
                kind: op.kind,
                collection: op.collection.clone(),
                retry_count: count,
                error: err.to_string(),
            };
            self.queue.emit(SyncEvent::PermanentFailure {
                id: eviction.id,
                kind: eviction.kind,
                collection: eviction.collection.clone(),
                retry_count: eviction.retry_count,
                error: eviction.error.clone(),
            });
            report.evicted += 1;
            report.evictions.push(eviction);
        }
    }

    /// Removes an operation; returns false if that could not be persisted.
    async fn remove(&self, op: &Operation, report: &mut DrainReport) -> bool {
        match self.queue.remove(op.id).await {
            Ok(removed) => removed.is_some(),
            Err(e) => {
                error!(id = %op.id, error = %e, "could not remove operation");
                report.skipped_persistence += 1;
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "processor_tests.rs"]
mod tests;
