// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Engine error types.

/// Errors reported by the underlying ordered key-value engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine refused an operation because of a transaction conflict.
    ///
    /// Surfaced separately from other engine failures: a conflict means the
    /// whole unit of work should be aborted and re-run by the caller, while
    /// other errors are not retryable that way.
    #[error("transaction conflict: {0}")]
    Conflict(String),

    /// Any other engine failure.
    #[error("storage engine error: {0}")]
    Storage(rocksdb::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rocksdb::Error> for EngineError {
    fn from(err: rocksdb::Error) -> Self {
        use rocksdb::ErrorKind;
        match err.kind() {
            ErrorKind::Busy
            | ErrorKind::TimedOut
            | ErrorKind::Aborted
            | ErrorKind::Expired
            | ErrorKind::TryAgain => EngineError::Conflict(err.to_string()),
            _ => EngineError::Storage(err),
        }
    }
}

impl EngineError {
    /// Returns true if this error is a transaction conflict.
    #[inline]
    pub fn is_conflict(&self) -> bool {
        matches!(self, EngineError::Conflict(_))
    }
}
