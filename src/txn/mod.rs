// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Transaction lifecycle bridge.
//!
//! One [`TransactionBridge`] wraps one engine transaction for one logical
//! unit of work: lazy begin, abort polling before every operation,
//! commit with an optional durability fence, and idempotent abort.
//!
//! # Example
//!
//! ```no_run
//! use celestite::engine::RocksEngine;
//! use celestite::txn::{Fencing, TransactionBridge};
//! use std::path::Path;
//!
//! let engine = RocksEngine::open(Path::new("/tmp/bridge")).unwrap();
//!
//! let mut txn = TransactionBridge::with_fencing(&engine, Fencing::Enabled);
//! txn.put(b"key", b"value").unwrap();
//! txn.commit().unwrap(); // blocks until the WAL sync completes
//! ```

mod bridge;
mod error;

pub use bridge::{Fencing, TransactionBridge, TxnState};
pub use error::TxnError;
