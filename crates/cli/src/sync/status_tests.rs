// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::sync::processor::ProcessorConfig;
use crate::sync::queue::MutationQueue;
use crate::sync::test_helpers::{memory_queue, product, MockRemote};
use shelf_core::{MemoryQueueStore, OpKind};
use std::time::Duration;
use tokio::sync::Notify;

fn aggregator(queue: Arc<MutationQueue>, remote: MockRemote) -> SyncStatusAggregator {
    let processor = SyncProcessor::new(queue, Arc::new(remote), ProcessorConfig::default());
    SyncStatusAggregator::new(Arc::new(processor))
}

#[tokio::test]
async fn offline_with_pending() {
    let queue = Arc::new(memory_queue(&MemoryQueueStore::new(), false));
    queue.enqueue(OpKind::Create, "products", product("A")).await.unwrap();
    let status = aggregator(Arc::clone(&queue), MockRemote::new());

    assert_eq!(status.status(), SyncStatus::Offline);
    assert_eq!(status.pending_count(), 1);
    assert_eq!(status.retry().await, DrainOutcome::Skipped(SkipReason::Offline));

    let report = status.report().await;
    assert!(!report.online);
    assert_eq!(report.pending, 1);
    assert!(report.last_sync.is_none());
}

#[tokio::test]
async fn pending_then_synced_after_retry() {
    let queue = Arc::new(memory_queue(&MemoryQueueStore::new(), true));
    queue.enqueue(OpKind::Create, "products", product("A")).await.unwrap();
    let status = aggregator(Arc::clone(&queue), MockRemote::new());

    assert_eq!(status.status(), SyncStatus::Pending);
    assert!(matches!(status.retry().await, DrainOutcome::Completed(_)));

    let report = status.report().await;
    assert_eq!(report.status, SyncStatus::Synced);
    assert_eq!(report.pending, 0);
    assert!(report.last_sync.is_some());
    assert!(report.degraded.is_none());
}

#[tokio::test]
async fn syncing_while_pass_runs() {
    let queue = Arc::new(memory_queue(&MemoryQueueStore::new(), true));
    queue.enqueue(OpKind::Create, "products", product("A")).await.unwrap();
    let gate = Arc::new(Notify::new());
    let remote = MockRemote::new().with_gate(Arc::clone(&gate));
    let status = aggregator(Arc::clone(&queue), remote);

    let task = {
        let status = status.clone();
        tokio::spawn(async move { status.retry().await })
    };
    while status.status() != SyncStatus::Syncing {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(status.report().await.draining);

    gate.notify_one();
    task.await.unwrap();
    assert_eq!(status.status(), SyncStatus::Synced);
}

#[tokio::test]
async fn report_serializes_lowercase_status() {
    let queue = Arc::new(memory_queue(&MemoryQueueStore::new(), true));
    let status = aggregator(queue, MockRemote::new());

    let json = serde_json::to_value(status.report().await).unwrap();
    assert_eq!(json["status"], "synced");
    assert!(json.get("last_sync").is_none());
}
