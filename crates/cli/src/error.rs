// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors that can occur in the shelfrs library.
///
/// Only validation and persistence failures ever reach the caller of an
/// enqueue; remote failures are absorbed into per-operation retry state.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'shelf init' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("{0}")]
    Validation(String),

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("invalid JSON payload: {reason}\n  hint: pass a JSON object, e.g. '{{\"id\": \"p1\", \"name\": \"Milk\"}}'")]
    InvalidPayload { reason: String },

    #[error("invalid probe address '{0}'\n  hint: use host:port, e.g. 'example.com:443'")]
    InvalidProbe(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}

/// A specialized Result type for shelfrs operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<shelf_core::Error> for Error {
    fn from(e: shelf_core::Error) -> Self {
        match e {
            e if e.is_persistence() => Error::Persistence(e.to_string()),
            shelf_core::Error::Validation(s) => Error::Validation(s),
            shelf_core::Error::InvalidOpId(s) => Error::Validation(format!("invalid operation id: {s}")),
            other => Error::Persistence(other.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
