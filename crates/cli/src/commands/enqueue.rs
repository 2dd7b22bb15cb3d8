// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Commands that queue a mutation.
//!
//! They only queue: applying to the remote happens in `sync` or `watch`.

use chrono::Utc;
use serde_json::Value;
use shelf_core::product::PRODUCTS_COLLECTION;
use shelf_core::{OpId, OpKind, Payload, Product, REMOTE_ID_KEY};

use super::{parse_payload, Project};
use crate::error::Result;

pub async fn add(project: &Project, collection: &str, json: &str) -> Result<OpId> {
    let payload = parse_payload(json)?;
    enqueue(project, OpKind::Create, collection, payload).await
}

pub async fn update(project: &Project, collection: &str, json: &str) -> Result<OpId> {
    let payload = parse_payload(json)?;
    enqueue(project, OpKind::Update, collection, payload).await
}

pub async fn delete(project: &Project, collection: &str, id: &str) -> Result<OpId> {
    let mut payload = Payload::new();
    payload.insert(REMOTE_ID_KEY.to_string(), Value::String(id.to_string()));
    enqueue(project, OpKind::Delete, collection, payload).await
}

pub async fn scan(
    project: &Project,
    barcode: &str,
    name: &str,
    brand: Option<String>,
    category: Option<String>,
) -> Result<OpId> {
    let mut product = Product::scanned(barcode, name, Utc::now());
    product.brand = brand;
    product.category = category;
    enqueue(project, OpKind::Create, PRODUCTS_COLLECTION, product.into_payload()?).await
}

async fn enqueue(
    project: &Project,
    kind: OpKind,
    collection: &str,
    payload: Payload,
) -> Result<OpId> {
    let engine = project.open_engine(false)?;
    let id = engine.queue().enqueue(kind, collection, payload).await?;
    println!(
        "Queued {kind} on {collection} ({id}), {} pending",
        engine.queue().len()
    );
    Ok(id)
}

#[cfg(test)]
#[path = "enqueue_tests.rs"]
mod tests;
