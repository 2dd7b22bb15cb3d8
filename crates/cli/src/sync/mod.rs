// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline-first sync engine.
//!
//! Local mutations are queued durably and applied to the remote store in
//! order whenever connectivity allows.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  enqueue    │────►│   Queue     │────►│ QueueStore  │
//! │ (commands)  │     │ (Mutation)  │     │  (JSONL)    │
//! └─────────────┘     └──────┬──────┘     └─────────────┘
//!                            │ signal
//! ┌─────────────┐     ┌──────▼──────┐     ┌─────────────┐
//! │Connectivity │────►│  Processor  │────►│ RemoteStore │
//! │ (TcpProbe)  │     │   (drain)   │     │   (trait)   │
//! └─────────────┘     └──────┬──────┘     └─────────────┘
//!                            │
//!                     ┌──────▼──────┐
//!                     │   Status    │
//!                     │ (Aggregator)│
//!                     └─────────────┘
//! ```
//!
//! # Features
//!
//! - Persist-before-acknowledge enqueue
//! - FIFO drain with bounded retries and eviction
//! - Single drain at a time, triggered by reconnects and enqueues
//! - Broadcast change events for status displays
//! - Injectable remote store trait for testing

mod connectivity;
mod dir_remote;
mod engine;
mod event;
mod processor;
mod queue;
mod remote;
mod status;

pub use connectivity::{Connectivity, TcpProbe};
pub use dir_remote::DirectoryRemote;
pub use engine::SyncEngine;
pub use event::{DrainReport, Eviction, SyncEvent};
pub use processor::{DrainOutcome, ProcessorConfig, SkipReason, SyncProcessor};
pub use queue::MutationQueue;
pub use remote::{RemoteError, RemoteFuture, RemoteResult, RemoteStore};
pub use status::{SyncReport, SyncStatusAggregator};

#[cfg(test)]
mod test_helpers;
