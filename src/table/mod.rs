// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Relational tables over the byte-sorted store.
//!
//! [`TableAdapter`] composes the codecs, the index manager and the
//! transaction bridge: a row goes in as typed column values, comes out as
//! one primary record plus one entry per secondary index, all written to
//! the same transaction. This is the call pattern a host query-execution
//! layer drives; the adapter does no planning of its own.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use celestite::codec::{FieldDescriptor, FieldValue};
//! use celestite::engine::RocksEngine;
//! use celestite::index::{AtomicRowIdSequence, IndexDescriptor};
//! use celestite::table::{TableAdapter, TableSchema};
//! use celestite::txn::TransactionBridge;
//! use std::path::Path;
//!
//! let engine = RocksEngine::open(Path::new("/tmp/table")).unwrap();
//! let schema = TableSchema::new(
//!     1,
//!     vec![FieldDescriptor::integer(8), FieldDescriptor::text()],
//!     Some(IndexDescriptor::unique(0, "primary", vec![0])),
//!     vec![IndexDescriptor::new(1, "by_dept", vec![1])],
//! ).unwrap();
//! let table = TableAdapter::new(schema, Arc::new(AtomicRowIdSequence::new()));
//!
//! let mut txn = TransactionBridge::new(&engine);
//! let row = vec![FieldValue::Integer(5), FieldValue::text("eng")];
//! let pk = table.insert(&mut txn, &row).unwrap();
//! txn.commit().unwrap();
//! # let _ = pk;
//! ```

mod adapter;
mod error;
mod schema;


pub use adapter::{TableAdapter, TableScan};
pub use error::TableError;
pub use schema::TableSchema;
