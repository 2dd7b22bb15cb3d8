// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::op::{OpKind, Payload};
use crate::op_id::OpId;
use serde_json::json;
use similar_asserts::assert_eq;
use tempfile::TempDir;

fn make_op(wall_ms: u64, kind: OpKind, remote_id: Option<&str>) -> Operation {
    let mut payload = Payload::new();
    payload.insert("name".into(), json!(format!("item {wall_ms}")));
    if let Some(id) = remote_id {
        payload.insert("id".into(), json!(id));
    }
    Operation::new(
        OpId::new(wall_ms, 0, 1),
        kind,
        "products",
        payload,
        DateTime::from_timestamp_millis(wall_ms as i64).unwrap(),
    )
    .unwrap()
}

fn sample_queue() -> Vec<Operation> {
    let mut retried = make_op(3000, OpKind::Delete, Some("p3"));
    retried.retry_count = 2;
    vec![
        make_op(1000, OpKind::Create, None),
        make_op(2000, OpKind::Update, Some("p2")),
        retried,
    ]
}

#[test]
fn jsonl_store_empty_directory_loads_nothing() {
    let dir = TempDir::new().unwrap();
    let store = JsonlQueueStore::open(dir.path()).unwrap();

    assert!(store.load().unwrap().is_empty());
    assert!(store.load_last_sync().unwrap().is_none());
}

#[test]
fn jsonl_store_save_load_is_fixed_point() {
    let dir = TempDir::new().unwrap();
    let mut store = JsonlQueueStore::open(dir.path()).unwrap();

    let ops = sample_queue();
    store.save(&ops).unwrap();
    let loaded = store.load().unwrap();
    assert_eq!(loaded, ops);

    store.save(&loaded).unwrap();
    assert_eq!(store.load().unwrap(), ops);
}

#[test]
fn jsonl_store_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let ops = sample_queue();

    {
        let mut store = JsonlQueueStore::open(dir.path()).unwrap();
        store.save(&ops).unwrap();
    }

    let store = JsonlQueueStore::open(dir.path()).unwrap();
    let loaded = store.load().unwrap();
    assert_eq!(loaded, ops);
    assert_eq!(loaded[2].retry_count, 2);
}

#[test]
fn jsonl_store_uses_fixed_keys() {
    let dir = TempDir::new().unwrap();
    let store = JsonlQueueStore::open(dir.path()).unwrap();

    assert_eq!(store.queue_path(), dir.path().join("offline_sync_queue.jsonl"));
    assert_eq!(store.last_sync_path(), dir.path().join("last_sync_timestamp"));
}

#[test]
fn jsonl_store_is_exclusive() {
    let dir = TempDir::new().unwrap();
    let _first = JsonlQueueStore::open(dir.path()).unwrap();

    let second = JsonlQueueStore::open(dir.path());
    assert!(matches!(second, Err(Error::Locked(_))));
}

#[test]
fn jsonl_store_lock_released_on_drop() {
    let dir = TempDir::new().unwrap();
    drop(JsonlQueueStore::open(dir.path()).unwrap());

    assert!(JsonlQueueStore::open(dir.path()).is_ok());
}

#[test]
fn jsonl_store_last_sync_roundtrip() {
    let dir = TempDir::new().unwrap();
    let mut store = JsonlQueueStore::open(dir.path()).unwrap();
    let at = DateTime::parse_from_rfc3339("2026-03-04T05:06:07Z").unwrap().with_timezone(&Utc);

    store.save_last_sync(at).unwrap();

    assert_eq!(store.load_last_sync().unwrap(), Some(at));
}

#[test]
fn jsonl_store_corrupted_last_sync() {
    let dir = TempDir::new().unwrap();
    let store = JsonlQueueStore::open(dir.path()).unwrap();
    std::fs::write(store.last_sync_path(), "yesterday").unwrap();

    assert!(matches!(store.load_last_sync(), Err(Error::CorruptedData(_))));
}

#[test]
fn memory_store_shares_contents_between_clones() {
    let store = MemoryQueueStore::new();
    let mut writer = store.clone();

    writer.save(&sample_queue()).unwrap();

    assert_eq!(store.contents().len(), 3);
    assert_eq!(store.save_count(), 1);
}

#[test]
fn memory_store_injected_failure_keeps_previous_contents() {
    let mut store = MemoryQueueStore::with_ops(sample_queue());
    store.set_fail_saves(true);

    let err = store.save(&[]).unwrap_err();

    assert!(err.is_persistence());
    assert_eq!(store.contents().len(), 3);
}
