// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Transactional secondary indexes and scans.
//!
//! A secondary index is stored as one engine entry per distinct secondary
//! key, whose value is the set of primary keys sharing that key. All index
//! maintenance runs inside the same transaction as the primary-row write,
//! so an abort rolls back both sides together.
//!
//! # Key Concepts
//!
//! - [`SecondaryIndexManager`]: insert/delete/update/lookup/scan over one
//!   table's indexes.
//! - [`ScanCursor`]: resumable batched iteration over any key range.
//! - [`RowIdSequence`]: pluggable source of hidden primary keys for tables
//!   without an explicit one.
//!
//! # Example
//!
//! ```no_run
//! use celestite::codec::{FieldDescriptor, FieldValue};
//! use celestite::engine::RocksEngine;
//! use celestite::index::{IndexDescriptor, SecondaryIndexManager};
//! use celestite::txn::TransactionBridge;
//! use std::path::Path;
//!
//! let engine = RocksEngine::open(Path::new("/tmp/index")).unwrap();
//! let manager = SecondaryIndexManager::new(
//!     1,
//!     vec![FieldDescriptor::integer(8), FieldDescriptor::text()],
//! );
//! let by_dept = IndexDescriptor::new(1, "by_dept", vec![1]);
//!
//! let mut txn = TransactionBridge::new(&engine);
//! let row = vec![FieldValue::Integer(5), FieldValue::text("eng")];
//! manager.insert(&mut txn, &by_dept, &row, b"pk5").unwrap();
//! txn.commit().unwrap();
//! ```

mod cursor;
mod descriptor;
mod error;
mod key_set;
mod keyspace;
mod secondary;
mod sequence;

pub use cursor::ScanCursor;
pub use descriptor::IndexDescriptor;
pub use error::IndexError;
pub use key_set::{decode_key_set, encode_key_set, PrimaryKeySet};
pub use keyspace::{
    index_key, index_key_prefix, row_key, row_key_prefix, INDEX_KEYSPACE, INDEX_PREFIX_LEN,
    ROW_KEYSPACE, ROW_PREFIX_LEN,
};
pub use secondary::{IndexScan, SecondaryIndexManager};
pub use sequence::{AtomicRowIdSequence, RowIdSequence};
