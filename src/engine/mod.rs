// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! The ordered, transactional key-value engine boundary.
//!
//! Everything above this module treats the engine as opaque: a byte-sorted
//! map with transactions that the engine may unilaterally abort on
//! conflict. Concurrency control lives entirely on the engine side; this
//! crate only observes abort outcomes through [`KvTransaction::is_aborted`].
//!
//! [`RocksEngine`] is the production implementation, backed by
//! `rocksdb::TransactionDB`.

mod error;
mod rocks;

pub use error::EngineError;
pub use rocks::{RocksEngine, RocksTransaction};

use crate::codec::KeyRange;

/// One engine-side transaction.
///
/// Write operations may fail with [`EngineError::Conflict`] at any point;
/// after a conflict the transaction is dead and [`is_aborted`] returns true
/// for the rest of its life.
///
/// [`is_aborted`]: KvTransaction::is_aborted
pub trait KvTransaction {
    /// Reads the value stored under `key`, if any.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, EngineError>;

    /// Reads `key` and takes an exclusive lock on it, so a
    /// read-modify-write cannot lose an update to a concurrent transaction.
    fn get_for_update(&self, key: &[u8]) -> Result<Option<Vec<u8>>, EngineError>;

    /// Writes `value` under `key`.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), EngineError>;

    /// Removes `key`.
    fn delete(&self, key: &[u8]) -> Result<(), EngineError>;

    /// Returns up to `limit` key-value pairs inside `range`, in key order.
    fn scan(&self, range: &KeyRange, limit: usize)
        -> Result<Vec<(Vec<u8>, Vec<u8>)>, EngineError>;

    /// Commits the transaction, consuming it.
    fn commit(self) -> Result<(), EngineError>;

    /// Rolls the transaction back. Idempotent at the engine level.
    fn rollback(&self) -> Result<(), EngineError>;

    /// Returns true once the engine has aborted this transaction.
    fn is_aborted(&self) -> bool;
}

/// An ordered key-value engine that can open transactions.
pub trait KvEngine: Send + Sync {
    type Txn<'e>: KvTransaction
    where
        Self: 'e;

    /// Begins a new transaction.
    ///
    /// `fenced` selects the durability of the eventual commit: a fenced
    /// transaction's commit blocks until the write-ahead log is synced to
    /// disk, an unfenced one returns once the engine acknowledges the
    /// transaction locally.
    fn begin(&self, fenced: bool) -> Result<Self::Txn<'_>, EngineError>;
}
