// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Table error types.

use crate::codec::CodecError;
use crate::index::IndexError;
use crate::txn::TxnError;

/// Errors that can occur in table operations.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("transaction error: {0}")]
    Txn(#[from] TxnError),

    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// A point lookup required a row that is not there. Distinct from
    /// corruption: the store is fine, the row just does not exist.
    #[error("no row stored under primary key {key:?}")]
    RowNotFound { key: Vec<u8> },

    /// A row with this primary key already exists.
    #[error("duplicate primary key {key:?}")]
    DuplicateKey { key: Vec<u8> },

    /// A row's value count disagrees with the schema.
    #[error("row has {got} values but the schema has {expected} columns")]
    RowArity { expected: usize, got: usize },

    #[error("invalid schema: {0}")]
    InvalidSchema(String),
}
