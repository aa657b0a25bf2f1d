// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Index error types.

use crate::codec::CodecError;
use crate::txn::TxnError;

/// Errors that can occur in index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("transaction error: {0}")]
    Txn(#[from] TxnError),

    /// A unique index already maps this key to a different primary key.
    #[error("unique index violation on {index:?}")]
    UniqueViolation { index: String },

    /// An index descriptor references a column the schema does not have.
    #[error("index column {column} out of bounds for a schema of {columns} columns")]
    ColumnOutOfBounds { column: usize, columns: usize },

    /// A lookup bound the wrong number of columns for its index.
    #[error("lookup bound {got} columns but index {index:?} takes {expected}")]
    BoundArity {
        index: String,
        expected: usize,
        got: usize,
    },
}

impl IndexError {
    /// Returns true if the enclosing transaction was aborted.
    #[inline]
    pub fn is_aborted(&self) -> bool {
        matches!(
            self,
            IndexError::Txn(TxnError::Aborted) | IndexError::Txn(TxnError::AlreadyAborted)
        )
    }
}
