// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered queue of pending mutations.
//!
//! The in-memory queue is only changed after the durable store accepted the
//! new snapshot, so a crash at any point leaves either the old or the new
//! queue on disk and never loses an acknowledged enqueue.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use shelf_core::{OpId, OpIdGenerator, OpKind, Operation, Payload, QueueStore};
use tokio::sync::{broadcast, Mutex, Notify};
use tracing::{debug, error};

use super::connectivity::Connectivity;
use super::event::SyncEvent;
use crate::error::{Error, Result};

const EVENT_CAPACITY: usize = 256;

struct Inner {
    ops: Vec<Operation>,
    last_sync: Option<DateTime<Utc>>,
    store: Box<dyn QueueStore>,
}

/// Durable FIFO of pending operations.
pub struct MutationQueue {
    inner: Mutex<Inner>,
    pending: AtomicUsize,
    degraded: RwLock<Option<String>>,
    id_gen: OpIdGenerator,
    connectivity: Connectivity,
    events: broadcast::Sender<SyncEvent>,
    drain: Arc<Notify>,
}

impl MutationQueue {
    /// Rehydrates the queue from the store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if the stored queue cannot be read.
    pub fn open(
        store: Box<dyn QueueStore>,
        id_gen: OpIdGenerator,
        connectivity: Connectivity,
    ) -> Result<Self> {
        let ops = store.load()?;
        let last_sync = store.load_last_sync()?;
        for op in &ops {
            id_gen.observe(&op.id);
        }
        debug!(pending = ops.len(), "rehydrated queue");

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(MutationQueue {
            pending: AtomicUsize::new(ops.len()),
            inner: Mutex::new(Inner {
                ops,
                last_sync,
                store,
            }),
            degraded: RwLock::new(None),
            id_gen,
            connectivity,
            events,
            drain: Arc::new(Notify::new()),
        })
    }

    /// Validates, persists and appends a mutation.
    ///
    /// Never waits on the network: if online, the drain worker is signalled
    /// and the call returns.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] if the operation is malformed, or
    /// [`Error::Persistence`] if it could not be made durable. In both cases
    /// nothing is queued.
    pub async fn enqueue(
        &self,
        kind: OpKind,
        collection: &str,
        payload: Payload,
    ) -> Result<OpId> {
        let mut inner = self.inner.lock().await;
        let op = Operation::new(self.id_gen.next_id(), kind, collection, payload, Utc::now())?;
        let id = op.id;

        let mut next = inner.ops.clone();
        next.push(op);
        self.persist(&mut inner, next)?;
        let pending = inner.ops.len();
        drop(inner);

        debug!(%id, %kind, collection, pending, "enqueued");
        self.emit(SyncEvent::Enqueued {
            id,
            kind,
            collection: collection.to_string(),
            pending,
        });
        if self.connectivity.is_online() {
            self.drain.notify_one();
        }
        Ok(id)
    }

    /// Returns a copy of the pending operations in order.
    pub async fn snapshot(&self) -> Vec<Operation> {
        self.inner.lock().await.ops.clone()
    }

    /// Removes an operation. Returns `None` if it is no longer queued.
    pub async fn remove(&self, id: OpId) -> Result<Option<Operation>> {
        let mut inner = self.inner.lock().await;
        let Some(pos) = inner.ops.iter().position(|op| op.id == id) else {
            return Ok(None);
        };
        let mut next = inner.ops.clone();
        let removed = next.remove(pos);
        self.persist(&mut inner, next)?;
        Ok(Some(removed))
    }

    /// Increments an operation's retry count and returns the new count.
    pub async fn mark_retried(&self, id: OpId) -> Result<Option<u32>> {
        let mut inner = self.inner.lock().await;
        let Some(pos) = inner.ops.iter().position(|op| op.id == id) else {
            return Ok(None);
        };
        let mut next = inner.ops.clone();
        next[pos].retry_count = next[pos].retry_count.saturating_add(1);
        let count = next[pos].retry_count;
        self.persist(&mut inner, next)?;
        Ok(Some(count))
    }

    /// Drops every pending operation.
    pub async fn clear(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        self.persist(&mut inner, Vec::new())?;
        drop(inner);
        self.emit(SyncEvent::Cleared);
        Ok(())
    }

    /// Time of the last pass that left the queue empty.
    pub async fn last_sync(&self) -> Option<DateTime<Utc>> {
        self.inner.lock().await.last_sync
    }

    pub(crate) async fn record_last_sync(&self, at: DateTime<Utc>) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if let Err(e) = inner.store.save_last_sync(at) {
            return Err(self.degrade(e.into()));
        }
        inner.last_sync = Some(at);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Last persistence failure, cleared by the next successful write.
    pub fn degraded(&self) -> Option<String> {
        self.degraded
            .read()
            .map(|d| d.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    /// Notified whenever an enqueue happens while online.
    pub fn drain_signal(&self) -> Arc<Notify> {
        Arc::clone(&self.drain)
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    pub(crate) fn emit(&self, event: SyncEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn persist(&self, inner: &mut Inner, next: Vec<Operation>) -> Result<()> {
        if let Err(e) = inner.store.save(&next) {
            return Err(self.degrade(e.into()));
        }
        self.pending.store(next.len(), Ordering::Release);
        inner.ops = next;
        self.set_degraded(None);
        Ok(())
    }

    fn degrade(&self, err: Error) -> Error {
        let message = err.to_string();
        error!(error = %message, "queue persistence failed");
        self.set_degraded(Some(message.clone()));
        self.emit(SyncEvent::PersistenceDegraded { error: message });
        err
    }

    fn set_degraded(&self, value: Option<String>) {
        match self.degraded.write() {
            Ok(mut d) => *d = value,
            Err(e) => *e.into_inner() = value,
        }
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
