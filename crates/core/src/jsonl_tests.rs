// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TestRecord {
    id: u32,
    name: String,
}

fn record(id: u32, name: &str) -> TestRecord {
    TestRecord { id, name: name.into() }
}

#[test]
fn read_all_returns_empty_for_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.jsonl");

    let records: Vec<TestRecord> = read_all(&path).unwrap();
    assert!(records.is_empty());
}

#[test]
fn write_then_read_preserves_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.jsonl");

    let records = vec![record(3, "third"), record(1, "first"), record(2, "second")];
    write_atomic(&path, &records).unwrap();

    let loaded: Vec<TestRecord> = read_all(&path).unwrap();
    assert_eq!(loaded, records);
}

#[test]
fn write_atomic_replaces_content() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.jsonl");

    write_atomic(&path, &[record(1, "a"), record(2, "b")]).unwrap();
    write_atomic(&path, &[record(3, "c")]).unwrap();

    let loaded: Vec<TestRecord> = read_all(&path).unwrap();
    assert_eq!(loaded, vec![record(3, "c")]);
}

#[test]
fn write_atomic_leaves_no_temp_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.jsonl");

    write_atomic(&path, &[record(1, "a")]).unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["test.jsonl".to_string()]);
}

#[test]
fn write_atomic_empty_produces_empty_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.jsonl");

    write_atomic::<TestRecord>(&path, &[]).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn read_all_skips_blank_lines() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.jsonl");
    std::fs::write(&path, "{\"id\":1,\"name\":\"a\"}\n\n   \n{\"id\":2,\"name\":\"b\"}\n").unwrap();

    let loaded: Vec<TestRecord> = read_all(&path).unwrap();
    assert_eq!(loaded.len(), 2);
}

#[test]
fn read_all_reports_corrupted_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.jsonl");
    std::fs::write(&path, "{\"id\":1,\"name\":\"a\"}\nnot json\n").unwrap();

    let err = read_all::<TestRecord>(&path).unwrap_err();
    assert!(matches!(err, Error::CorruptedData(_)));
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn stale_temp_file_is_ignored_by_reader() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.jsonl");
    write_atomic(&path, &[record(1, "a")]).unwrap();

    // Simulate a crash that left a half-written temp file behind.
    std::fs::write(dir.path().join("test.jsonl.tmp"), "{\"id\":9,").unwrap();

    let loaded: Vec<TestRecord> = read_all(&path).unwrap();
    assert_eq!(loaded, vec![record(1, "a")]);
}

#[test]
fn failed_write_removes_temp_file() {
    let dir = TempDir::new().unwrap();
    // A non-empty directory in the way makes the final step fail
    let path = dir.path().join("test.jsonl");
    std::fs::create_dir(&path).unwrap();
    std::fs::write(path.join("keep"), "x").unwrap();

    assert!(write_atomic(&path, &[record(1, "a")]).is_err());

    assert!(!dir.path().join("test.jsonl.tmp").exists());
    assert!(path.join("keep").is_file());
}
