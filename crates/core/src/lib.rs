// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! shelf-core: Shared library for the shelf catalog sync engine
//!
//! This crate provides the data model for pending mutations, operation IDs,
//! sync status derivation, and the durable queue store used by the `shelf`
//! sync engine and CLI.

pub mod error;
pub mod jsonl;
pub mod op;
pub mod op_id;
pub mod product;
pub mod status;
pub mod store;

pub use error::{Error, Result};
pub use op::{OpKind, Operation, Payload, REMOTE_ID_KEY};
pub use op_id::{ClockSource, OpId, OpIdGenerator, SystemClock};
pub use product::Product;
pub use status::SyncStatus;
pub use store::{JsonlQueueStore, MemoryQueueStore, QueueStore};
