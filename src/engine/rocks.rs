// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! RocksDB-backed engine implementation.

use std::cell::Cell;
use std::path::Path;

use rocksdb::{
    Direction, IteratorMode, Options, Transaction, TransactionDB, TransactionDBOptions,
    TransactionOptions, WriteOptions,
};

use crate::codec::KeyRange;

use super::{EngineError, KvEngine, KvTransaction};

/// Ordered transactional store backed by `rocksdb::TransactionDB`.
///
/// Locking and conflict detection are RocksDB's: a write that cannot take
/// its lock in time fails with a busy/timed-out status, which this layer
/// classifies as [`EngineError::Conflict`].
pub struct RocksEngine {
    db: TransactionDB,
}

impl RocksEngine {
    /// Opens or creates a transactional database at the given path.
    pub fn open(path: &Path) -> Result<Self, EngineError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);

        // Optimize for our workload
        opts.set_write_buffer_size(64 * 1024 * 1024); // 64MB
        opts.set_max_write_buffer_number(4);
        opts.set_target_file_size_base(64 * 1024 * 1024);
        opts.set_level_compaction_dynamic_level_bytes(true);

        // Enable bloom filters for point lookups
        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        opts.set_block_based_table_factory(&block_opts);

        let txn_opts = TransactionDBOptions::default();
        let db = TransactionDB::open(&opts, &txn_opts, path)?;
        Ok(Self { db })
    }

    /// Opens a database with custom RocksDB options.
    pub fn open_with_options(
        path: &Path,
        opts: Options,
        txn_opts: TransactionDBOptions,
    ) -> Result<Self, EngineError> {
        let db = TransactionDB::open(&opts, &txn_opts, path)?;
        Ok(Self { db })
    }
}

impl KvEngine for RocksEngine {
    type Txn<'e> = RocksTransaction<'e>;

    fn begin(&self, fenced: bool) -> Result<Self::Txn<'_>, EngineError> {
        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(fenced);
        let txn_opts = TransactionOptions::default();

        Ok(RocksTransaction {
            inner: self.db.transaction_opt(&write_opts, &txn_opts),
            aborted: Cell::new(false),
        })
    }
}

/// One RocksDB transaction plus the abort flag the layers above poll.
///
/// RocksDB reports conflicts as operation errors rather than through a
/// queryable flag, so the flag is latched here the first time any
/// operation fails with a conflict status.
pub struct RocksTransaction<'db> {
    inner: Transaction<'db, TransactionDB>,
    aborted: Cell<bool>,
}

impl RocksTransaction<'_> {
    /// Classifies an engine result, latching the abort flag on conflict.
    fn check<T>(&self, result: Result<T, rocksdb::Error>) -> Result<T, EngineError> {
        result.map_err(|err| {
            let err = EngineError::from(err);
            if err.is_conflict() {
                self.aborted.set(true);
            }
            err
        })
    }
}

impl KvTransaction for RocksTransaction<'_> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, EngineError> {
        self.check(self.inner.get(key))
    }

    fn get_for_update(&self, key: &[u8]) -> Result<Option<Vec<u8>>, EngineError> {
        self.check(self.inner.get_for_update(key, true))
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), EngineError> {
        self.check(self.inner.put(key, value))
    }

    fn delete(&self, key: &[u8]) -> Result<(), EngineError> {
        self.check(self.inner.delete(key))
    }

    fn scan(
        &self,
        range: &KeyRange,
        limit: usize,
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>, EngineError> {
        let mut out = Vec::with_capacity(limit.min(1024));
        let iter = self
            .inner
            .iterator(IteratorMode::From(&range.start, Direction::Forward));

        for item in iter {
            if out.len() >= limit {
                break;
            }
            let (key, value) = self.check(item)?;
            if !range.contains(&key) {
                break;
            }
            out.push((key.into_vec(), value.into_vec()));
        }
        Ok(out)
    }

    fn commit(self) -> Result<(), EngineError> {
        self.inner.commit().map_err(EngineError::from)
    }

    fn rollback(&self) -> Result<(), EngineError> {
        self.check(self.inner.rollback())
    }

    fn is_aborted(&self) -> bool {
        self.aborted.get()
    }
}
