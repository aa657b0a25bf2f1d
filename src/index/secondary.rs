// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Secondary-index maintenance and lookup.
//!
//! Each secondary index maps an encoded secondary key to the set of primary
//! keys whose rows currently carry that key's column values. All mutations
//! run inside the caller-supplied transaction, alongside the primary-row
//! write, so an abort discards primary and index changes together. Nothing
//! here retries: any engine failure is surfaced and the caller is expected
//! to abort the whole transaction.

use tracing::debug;

use crate::codec::{
    build_bounds, encode_composite, with_upper_bound, FieldDescriptor, FieldValue, KeyRange,
    RangeMode,
};
use crate::engine::KvEngine;
use crate::txn::TransactionBridge;

use super::cursor::ScanCursor;
use super::descriptor::IndexDescriptor;
use super::error::IndexError;
use super::key_set::{decode_key_set, encode_key_set, PrimaryKeySet};
use super::keyspace::{index_key, index_key_prefix};

/// Maintains every secondary index of one table.
///
/// Holds the table id and column descriptors; index descriptors are passed
/// per call so one manager serves all of a table's indexes.
pub struct SecondaryIndexManager {
    table_id: u32,
    columns: Vec<FieldDescriptor>,
}

impl SecondaryIndexManager {
    /// Creates a manager for a table's column layout.
    pub fn new(table_id: u32, columns: Vec<FieldDescriptor>) -> Self {
        Self { table_id, columns }
    }

    /// Encodes the secondary key of `row` under `index`, including the
    /// index's key-space prefix.
    fn secondary_key(
        &self,
        index: &IndexDescriptor,
        row: &[FieldValue],
    ) -> Result<Vec<u8>, IndexError> {
        let mut components = Vec::with_capacity(index.columns.len());
        for &position in &index.columns {
            let descriptor = self.descriptor_at(position)?;
            let value = row.get(position).ok_or(IndexError::ColumnOutOfBounds {
                column: position,
                columns: self.columns.len(),
            })?;
            components.push((descriptor, value));
        }
        let suffix = encode_composite(&components)?;
        Ok(index_key(self.table_id, index.index_id, &suffix))
    }

    /// Encodes index-key bytes from the leading `values` of the index's
    /// columns, in index-key order.
    fn key_from_bound_values(
        &self,
        index: &IndexDescriptor,
        values: &[FieldValue],
    ) -> Result<Vec<u8>, IndexError> {
        let mut components = Vec::with_capacity(values.len());
        for (&position, value) in index.columns.iter().zip(values) {
            components.push((self.descriptor_at(position)?, value));
        }
        Ok(encode_composite(&components)?)
    }

    fn descriptor_at(&self, position: usize) -> Result<&FieldDescriptor, IndexError> {
        self.columns
            .get(position)
            .ok_or(IndexError::ColumnOutOfBounds {
                column: position,
                columns: self.columns.len(),
            })
    }

    /// Reads the primary-key set stored under `key`, taking a write lock.
    ///
    /// The lock makes the read-modify-write safe against concurrent
    /// transactions mutating the same set; the loser observes a conflict.
    fn read_set_for_update<E: KvEngine>(
        &self,
        txn: &mut TransactionBridge<'_, E>,
        key: &[u8],
    ) -> Result<PrimaryKeySet, IndexError> {
        match txn.get_for_update(key)? {
            Some(bytes) => Ok(decode_key_set(&bytes)?),
            None => Ok(PrimaryKeySet::new()),
        }
    }

    /// Adds `primary_key` to the set stored under `row`'s secondary key.
    pub fn insert<E: KvEngine>(
        &self,
        txn: &mut TransactionBridge<'_, E>,
        index: &IndexDescriptor,
        row: &[FieldValue],
        primary_key: &[u8],
    ) -> Result<(), IndexError> {
        let key = self.secondary_key(index, row)?;
        self.insert_at(txn, index, key, primary_key)
    }

    fn insert_at<E: KvEngine>(
        &self,
        txn: &mut TransactionBridge<'_, E>,
        index: &IndexDescriptor,
        key: Vec<u8>,
        primary_key: &[u8],
    ) -> Result<(), IndexError> {
        let mut set = self.read_set_for_update(txn, &key)?;
        if index.is_unique && !set.is_empty() && !set.contains(primary_key) {
            return Err(IndexError::UniqueViolation {
                index: index.name.clone(),
            });
        }
        if set.insert(primary_key.to_vec()) {
            txn.put(&key, &encode_key_set(&set))?;
            debug!(index = %index.name, "index entry added");
        }
        Ok(())
    }

    /// Removes `primary_key` from the set stored under `row`'s secondary
    /// key, dropping the entry when the set empties.
    pub fn delete<E: KvEngine>(
        &self,
        txn: &mut TransactionBridge<'_, E>,
        index: &IndexDescriptor,
        row: &[FieldValue],
        primary_key: &[u8],
    ) -> Result<(), IndexError> {
        let key = self.secondary_key(index, row)?;
        self.delete_at(txn, index, key, primary_key)
    }

    fn delete_at<E: KvEngine>(
        &self,
        txn: &mut TransactionBridge<'_, E>,
        index: &IndexDescriptor,
        key: Vec<u8>,
        primary_key: &[u8],
    ) -> Result<(), IndexError> {
        let mut set = self.read_set_for_update(txn, &key)?;
        if set.remove(primary_key) {
            if set.is_empty() {
                txn.delete(&key)?;
            } else {
                txn.put(&key, &encode_key_set(&set))?;
            }
            debug!(index = %index.name, "index entry removed");
        }
        Ok(())
    }

    /// Moves `primary_key` from `old_row`'s secondary key to `new_row`'s.
    ///
    /// When both rows encode to the same secondary key this is a no-op, so
    /// updates that leave the indexed columns untouched issue no writes.
    pub fn update<E: KvEngine>(
        &self,
        txn: &mut TransactionBridge<'_, E>,
        index: &IndexDescriptor,
        old_row: &[FieldValue],
        new_row: &[FieldValue],
        primary_key: &[u8],
    ) -> Result<(), IndexError> {
        let old_key = self.secondary_key(index, old_row)?;
        let new_key = self.secondary_key(index, new_row)?;
        if old_key == new_key {
            return Ok(());
        }
        self.delete_at(txn, index, old_key, primary_key)?;
        self.insert_at(txn, index, new_key, primary_key)
    }

    /// Returns the primary keys of rows whose indexed columns equal
    /// `bound_values` exactly. A miss is the empty set, not an error.
    pub fn lookup_exact<E: KvEngine>(
        &self,
        txn: &mut TransactionBridge<'_, E>,
        index: &IndexDescriptor,
        bound_values: &[FieldValue],
    ) -> Result<PrimaryKeySet, IndexError> {
        if bound_values.len() != index.columns.len() {
            return Err(IndexError::BoundArity {
                index: index.name.clone(),
                expected: index.columns.len(),
                got: bound_values.len(),
            });
        }
        let suffix = self.key_from_bound_values(index, bound_values)?;
        let key = index_key(self.table_id, index.index_id, &suffix);
        match txn.get(&key)? {
            Some(bytes) => Ok(decode_key_set(&bytes)?),
            None => Ok(PrimaryKeySet::new()),
        }
    }

    /// Scans all entries whose secondary key starts with the encoding of
    /// the leading `prefix_values` of the index's columns.
    ///
    /// Only a leading run of columns may be bound; values beyond the
    /// index's column count are rejected.
    pub fn scan_prefix(
        &self,
        index: &IndexDescriptor,
        prefix_values: &[FieldValue],
    ) -> Result<IndexScan, IndexError> {
        if prefix_values.len() > index.columns.len() {
            return Err(IndexError::BoundArity {
                index: index.name.clone(),
                expected: index.columns.len(),
                got: prefix_values.len(),
            });
        }
        let suffix = self.key_from_bound_values(index, prefix_values)?;
        let key = index_key(self.table_id, index.index_id, &suffix);
        let range = build_bounds(&key, RangeMode::Prefix);
        Ok(IndexScan::new(range, self.prefix_len(index)))
    }

    /// Scans entries between two encoded secondary keys.
    ///
    /// `start` and `end` are secondary-key bytes without the key-space
    /// prefix; `end = None` scans to the end of the index. An exclusive
    /// `end` discards an exact match on it.
    pub fn scan_range(
        &self,
        index: &IndexDescriptor,
        start: &[u8],
        end: Option<&[u8]>,
        end_inclusive: bool,
    ) -> IndexScan {
        let full_start = index_key(self.table_id, index.index_id, start);
        let range = match end {
            Some(end) => with_upper_bound(
                &full_start,
                &index_key(self.table_id, index.index_id, end),
                end_inclusive,
            ),
            None => {
                let namespace = index_key_prefix(self.table_id, index.index_id);
                let KeyRange { end, .. } = build_bounds(&namespace, RangeMode::Prefix);
                KeyRange {
                    start: full_start,
                    end,
                    end_inclusive: true,
                }
            }
        };
        IndexScan::new(range, self.prefix_len(index))
    }

    fn prefix_len(&self, index: &IndexDescriptor) -> usize {
        index_key_prefix(self.table_id, index.index_id).len()
    }
}

/// Incremental scan over one index's entries.
///
/// Yields `(secondary_key, primary_key_set)` pairs in secondary-key order;
/// the secondary key is returned without its key-space prefix, ready for
/// [`decode_composite`](crate::codec::decode_composite).
pub struct IndexScan {
    cursor: ScanCursor,
    prefix_len: usize,
}

impl IndexScan {
    fn new(range: KeyRange, prefix_len: usize) -> Self {
        Self {
            cursor: ScanCursor::new(range),
            prefix_len,
        }
    }

    /// Returns up to `max_items` entries, in key order.
    pub fn next_batch<E: KvEngine>(
        &mut self,
        txn: &mut TransactionBridge<'_, E>,
        max_items: usize,
    ) -> Result<Vec<(Vec<u8>, PrimaryKeySet)>, IndexError> {
        let raw = self.cursor.next_batch(txn, max_items)?;
        let mut out = Vec::with_capacity(raw.len());
        for (key, value) in raw {
            let secondary = key.get(self.prefix_len..).unwrap_or_default().to_vec();
            out.push((secondary, decode_key_set(&value)?));
        }
        Ok(out)
    }

    /// Returns true once the scan has been fully consumed.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.cursor.is_exhausted()
    }
}
