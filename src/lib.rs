// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Celestite: a relational table adapter over an ordered, transactional
//! key-value store.
//!
//! This crate stores relational rows (typed, nullable columns, a primary
//! key, secondary indexes) entirely as opaque byte-string keys and values
//! in a byte-sorted engine, while preserving SQL ordering, NULL semantics,
//! composite-key prefix search, and cross-index transactional consistency.

pub mod codec;
pub mod engine;
pub mod index;
pub mod table;
pub mod txn;

pub use codec::{
    build_bounds, decode_row, encode_composite, encode_row, CodecError, FieldDescriptor,
    FieldType, FieldValue, KeyRange, RangeMode, Row,
};
pub use engine::{EngineError, KvEngine, KvTransaction, RocksEngine};
pub use index::{
    AtomicRowIdSequence, IndexDescriptor, IndexError, IndexScan, PrimaryKeySet, RowIdSequence,
    ScanCursor, SecondaryIndexManager,
};
pub use table::{TableAdapter, TableError, TableSchema, TableScan};
pub use txn::{Fencing, TransactionBridge, TxnError, TxnState};
