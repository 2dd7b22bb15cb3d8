// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::testing::TestProject;
use crate::error::Error;
use serde_json::json;

async fn pending(test: &TestProject) -> Vec<shelf_core::Operation> {
    let engine = test.project.open_engine(false).unwrap();
    engine.queue().snapshot().await
}

#[tokio::test]
async fn add_update_delete_queue_in_order() {
    let test = TestProject::new();
    let a = add(&test.project, "lists", r#"{"title": "Groceries"}"#).await.unwrap();
    let b = update(&test.project, "lists", r#"{"id": "l1", "title": "Food"}"#)
        .await
        .unwrap();
    let c = delete(&test.project, "lists", "l2").await.unwrap();

    let ops = pending(&test).await;
    assert_eq!(ops.iter().map(|op| op.id).collect::<Vec<_>>(), vec![a, b, c]);
    assert_eq!(ops[0].kind, OpKind::Create);
    assert_eq!(ops[1].remote_id(), Some("l1"));
    assert_eq!(ops[2].payload["id"], json!("l2"));
    assert!(test.remote_records("lists").is_empty());
}

#[tokio::test]
async fn update_without_id_is_rejected() {
    let test = TestProject::new();
    let err = update(&test.project, "products", r#"{"name": "X"}"#)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert!(pending(&test).await.is_empty());
}

#[tokio::test]
async fn add_rejects_non_object() {
    let test = TestProject::new();
    let err = add(&test.project, "lists", "[]").await.unwrap_err();
    assert!(matches!(err, Error::InvalidPayload { .. }));
}

#[tokio::test]
async fn scan_queues_product_create() {
    let test = TestProject::new();
    scan(
        &test.project,
        "7891000100103",
        "Milk",
        Some("Acme".to_string()),
        None,
    )
    .await
    .unwrap();

    let ops = pending(&test).await;
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].collection, PRODUCTS_COLLECTION);
    assert_eq!(ops[0].payload["barcode"], json!("7891000100103"));
    assert_eq!(ops[0].payload["brand"], json!("Acme"));
    assert_eq!(ops[0].payload["scannedCount"], json!(1));
    shelf_core::product::validate(&ops[0].payload, false).unwrap();
}
