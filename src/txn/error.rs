// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Transaction error types.

use crate::engine::EngineError;

/// Errors that can occur in transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TxnError {
    /// The engine aborted the transaction because of a conflict.
    ///
    /// Kept distinct from every other error so the caller's retry policy
    /// (re-run the whole unit of work) is never masked.
    #[error("transaction aborted by storage engine conflict")]
    Aborted,

    #[error("transaction already committed")]
    AlreadyCommitted,

    #[error("transaction already aborted")]
    AlreadyAborted,

    /// A non-conflict engine failure.
    #[error("engine error: {0}")]
    Engine(EngineError),
}

impl From<EngineError> for TxnError {
    fn from(err: EngineError) -> Self {
        if err.is_conflict() {
            TxnError::Aborted
        } else {
            TxnError::Engine(err)
        }
    }
}
