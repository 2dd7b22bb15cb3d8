// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Wires the sync components together and runs the drain worker.

use std::sync::Arc;

use shelf_core::{OpIdGenerator, QueueStore};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::connectivity::Connectivity;
use super::event::SyncEvent;
use super::processor::{ProcessorConfig, SyncProcessor};
use super::queue::MutationQueue;
use super::remote::RemoteStore;
use super::status::SyncStatusAggregator;
use crate::error::Result;

/// Owns one instance of every sync component.
pub struct SyncEngine {
    connectivity: Connectivity,
    queue: Arc<MutationQueue>,
    processor: Arc<SyncProcessor>,
    status: SyncStatusAggregator,
    cancel: CancellationToken,
    worker: Option<JoinHandle<()>>,
}

impl SyncEngine {
    /// Builds the engine, rehydrating the queue from the store.
    pub fn new(
        store: Box<dyn QueueStore>,
        remote: Arc<dyn RemoteStore>,
        connectivity: Connectivity,
        id_gen: OpIdGenerator,
        config: ProcessorConfig,
    ) -> Result<Self> {
        let queue = Arc::new(MutationQueue::open(store, id_gen, connectivity.clone())?);
        let processor = Arc::new(SyncProcessor::new(Arc::clone(&queue), remote, config));
        let status = SyncStatusAggregator::new(Arc::clone(&processor));
        Ok(SyncEngine {
            connectivity,
            queue,
            processor,
            status,
            cancel: CancellationToken::new(),
            worker: None,
        })
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    pub fn queue(&self) -> &Arc<MutationQueue> {
        &self.queue
    }

    pub fn processor(&self) -> &Arc<SyncProcessor> {
        &self.processor
    }

    pub fn status(&self) -> &SyncStatusAggregator {
        &self.status
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.queue.subscribe()
    }

    /// Token cancelled on shutdown, for tasks tied to the engine's lifetime.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Starts the drain worker. Calling it again is a no-op.
    ///
    /// The worker drains once at startup (a rehydrated queue may be waiting),
    /// then on every offline→online transition and every enqueue made while
    /// online.
    pub fn start(&mut self) {
        if self.worker.is_some() {
            return;
        }
        let processor = Arc::clone(&self.processor);
        let signal = self.queue.drain_signal();
        let mut online_rx = self.connectivity.subscribe();
        let cancel = self.cancel.clone();

        self.worker = Some(tokio::spawn(async move {
            let mut was_online = *online_rx.borrow_and_update();
            processor.drain().await;
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    changed = online_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let online = *online_rx.borrow_and_update();
                        let came_online = online && !was_online;
                        was_online = online;
                        if came_online {
                            debug!("back online, draining");
                            processor.drain().await;
                        }
                    }
                    _ = signal.notified() => {
                        processor.drain().await;
                    }
                }
            }
            debug!("drain worker stopped");
        }));
        info!("sync engine started");
    }

    /// Stops the worker and any task holding the cancel token.
    ///
    /// A pass in progress runs to completion first.
    pub async fn shutdown(&mut self) {
        self.cancel.cancel();
        if let Some(worker) = self.worker.take() {
            let _ = worker.await;
        }
        info!("sync engine stopped");
    }
}

impl Drop for SyncEngine {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
