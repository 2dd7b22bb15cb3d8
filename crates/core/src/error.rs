// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for shelf-core operations.

use thiserror::Error;

/// All possible errors that can occur in shelf-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid operation: {0}")]
    Validation(String),

    #[error("invalid operation id: {0}")]
    InvalidOpId(String),

    #[error("queue is locked by another process: {0}\n  hint: stop any running 'shelf watch' and retry")]
    Locked(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),

    #[error("{0}")]
    InjectedFailure(String),
}

impl Error {
    /// Returns true for failures of the durable store (as opposed to
    /// rejected input).
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            Error::Io(_)
                | Error::Json(_)
                | Error::CorruptedData(_)
                | Error::Locked(_)
                | Error::InjectedFailure(_)
        )
    }
}

/// A specialized Result type for shelf-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
