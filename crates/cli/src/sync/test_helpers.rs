// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use shelf_core::{MemoryQueueStore, OpIdGenerator, Payload};
use tokio::sync::Notify;

use super::connectivity::Connectivity;
use super::queue::MutationQueue;
use super::remote::{RemoteError, RemoteFuture, RemoteResult, RemoteStore};

/// A call received by [`MockRemote`].
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    Create { collection: String, payload: Payload },
    Update { collection: String, id: String },
    Delete { collection: String, id: String },
}

impl RemoteCall {
    /// Short `kind:collection[/id]` form for order assertions.
    pub fn label(&self) -> String {
        match self {
            RemoteCall::Create { collection, payload } => {
                let name = payload.get("name").and_then(Value::as_str).unwrap_or("");
                format!("create:{collection}:{name}")
            }
            RemoteCall::Update { collection, id } => format!("update:{collection}/{id}"),
            RemoteCall::Delete { collection, id } => format!("delete:{collection}/{id}"),
        }
    }
}

#[derive(Default)]
struct MockState {
    calls: Vec<RemoteCall>,
    /// Scripted results, consumed one per call; empty means success.
    script: VecDeque<RemoteResult<()>>,
    /// Errors returned for every call on a given record id.
    failing_ids: HashMap<String, RemoteError>,
    next_id: u64,
}

/// Mock remote store that records calls and returns scripted failures.
#[derive(Clone, Default)]
pub struct MockRemote {
    state: Arc<Mutex<MockState>>,
    delay: Option<Duration>,
    /// When set, each call waits here before completing.
    gate: Option<Arc<Notify>>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call sleep before completing.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Makes every call block until the gate is notified.
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Queues a result for the next call.
    pub fn push_result(&self, result: RemoteResult<()>) {
        self.state.lock().unwrap().script.push_back(result);
    }

    /// Fails every update/delete on the given record id.
    pub fn fail_id(&self, id: &str, err: RemoteError) {
        self.state.lock().unwrap().failing_ids.insert(id.to_string(), err);
    }

    pub fn clear_failures(&self) {
        let mut state = self.state.lock().unwrap();
        state.script.clear();
        state.failing_ids.clear();
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn labels(&self) -> Vec<String> {
        self.calls().iter().map(RemoteCall::label).collect()
    }

    async fn respond(&self, call: RemoteCall, id: Option<&str>) -> RemoteResult<u64> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if let Some(err) = id.and_then(|id| state.failing_ids.get(id)) {
            return Err(err.clone());
        }
        state.script.pop_front().unwrap_or(Ok(()))?;
        state.next_id += 1;
        Ok(state.next_id)
    }
}

impl RemoteStore for MockRemote {
    fn create<'a>(&'a self, collection: &'a str, payload: &'a Payload) -> RemoteFuture<'a, String> {
        Box::pin(async move {
            let call = RemoteCall::Create {
                collection: collection.to_string(),
                payload: payload.clone(),
            };
            let n = self.respond(call, None).await?;
            Ok(format!("remote-{n}"))
        })
    }

    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        _payload: &'a Payload,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            let call = RemoteCall::Update {
                collection: collection.to_string(),
                id: id.to_string(),
            };
            self.respond(call, Some(id)).await.map(|_| ())
        })
    }

    fn delete<'a>(&'a self, collection: &'a str, id: &'a str) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            let call = RemoteCall::Delete {
                collection: collection.to_string(),
                id: id.to_string(),
            };
            self.respond(call, Some(id)).await.map(|_| ())
        })
    }
}

/// Builds a JSON object payload.
pub fn payload(value: Value) -> Payload {
    value.as_object().cloned().unwrap()
}

/// Payload for a product create.
pub fn product(name: &str) -> Payload {
    payload(json!({
        "barcode": format!("bc-{name}"),
        "name": name,
        "scannedAt": "2026-01-01T00:00:00.000Z",
    }))
}

/// Payload addressing an existing record.
pub fn with_id(id: &str) -> Payload {
    payload(json!({ "id": id }))
}

/// Opens a queue over an in-memory store.
pub fn memory_queue(store: &MemoryQueueStore, online: bool) -> MutationQueue {
    MutationQueue::open(
        Box::new(store.clone()),
        OpIdGenerator::new(1),
        Connectivity::new(online),
    )
    .unwrap()
}
