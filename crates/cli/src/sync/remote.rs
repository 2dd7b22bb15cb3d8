// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote document store abstraction.
//!
//! The sync processor only needs three calls from the backend. Keeping them
//! behind a trait lets tests script failures and lets the CLI use a
//! directory-backed store.

use std::future::Future;
use std::pin::Pin;

use shelf_core::Payload;

/// Error type for remote store calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The target record does not exist.
    #[error("record {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    /// Network or backend failure that may succeed on a later attempt.
    #[error("transient remote failure: {0}")]
    Transient(String),

    /// The backend rejected the write (schema, permissions).
    #[error("remote rejected write: {0}")]
    Permanent(String),
}

impl RemoteError {
    /// Returns true if retrying could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        !matches!(self, RemoteError::Permanent(_))
    }
}

/// Result type for remote store calls.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Boxed future returned by [`RemoteStore`] methods.
pub type RemoteFuture<'a, T> = Pin<Box<dyn Future<Output = RemoteResult<T>> + Send + 'a>>;

/// A remote document store keyed by collection and record id.
pub trait RemoteStore: Send + Sync {
    /// Adds a new record and returns its remote id.
    fn create<'a>(&'a self, collection: &'a str, payload: &'a Payload) -> RemoteFuture<'a, String>;

    /// Merges the payload's fields into an existing record.
    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        payload: &'a Payload,
    ) -> RemoteFuture<'a, ()>;

    /// Deletes a record.
    fn delete<'a>(&'a self, collection: &'a str, id: &'a str) -> RemoteFuture<'a, ()>;
}
