// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! The table adapter: rows in, keys and values out.

use std::sync::Arc;

use tracing::debug;

use crate::codec::{
    build_bounds, decode_row, encode_composite, encode_row, FieldDescriptor, FieldValue, RangeMode,
    Row,
};
use crate::engine::KvEngine;
use crate::index::{
    row_key, row_key_prefix, IndexDescriptor, IndexScan, PrimaryKeySet, RowIdSequence, ScanCursor,
    SecondaryIndexManager, ROW_PREFIX_LEN,
};
use crate::txn::TransactionBridge;

use super::error::TableError;
use super::schema::TableSchema;

/// Stores one table's rows and maintains its secondary indexes.
///
/// Every operation runs against a caller-supplied [`TransactionBridge`]:
/// the primary-row write and all index writes of one logical operation land
/// in the same engine transaction, so an abort discards them together. The
/// adapter never retries a failed engine write; it surfaces the failure and
/// leaves aborting the transaction to the caller.
pub struct TableAdapter {
    schema: TableSchema,
    indexes: SecondaryIndexManager,
    row_ids: Arc<dyn RowIdSequence>,
}

impl TableAdapter {
    /// Creates an adapter over a validated schema.
    ///
    /// `row_ids` supplies hidden primary keys for schemas without an
    /// explicit primary index; it is injected so a durably-persisted
    /// sequence can replace the in-memory default.
    pub fn new(schema: TableSchema, row_ids: Arc<dyn RowIdSequence>) -> Self {
        let indexes = SecondaryIndexManager::new(schema.table_id, schema.columns.clone());
        Self {
            schema,
            indexes,
            row_ids,
        }
    }

    /// Returns the table schema.
    #[inline]
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Returns the index manager, for direct index operations.
    #[inline]
    pub fn index_manager(&self) -> &SecondaryIndexManager {
        &self.indexes
    }

    /// Looks up a secondary index by name.
    pub fn secondary_index(&self, name: &str) -> Option<&IndexDescriptor> {
        self.schema.secondary.iter().find(|index| index.name == name)
    }

    fn check_arity(&self, row: &[FieldValue]) -> Result<(), TableError> {
        if row.len() != self.schema.columns.len() {
            return Err(TableError::RowArity {
                expected: self.schema.columns.len(),
                got: row.len(),
            });
        }
        Ok(())
    }

    /// Encodes the primary key of `row` under the explicit primary index.
    fn primary_key_of(
        &self,
        index: &IndexDescriptor,
        row: &[FieldValue],
    ) -> Result<Vec<u8>, TableError> {
        let mut components = Vec::with_capacity(index.columns.len());
        for &position in &index.columns {
            // Schema validation pinned every position inside the column list.
            let descriptor = self.schema.columns.get(position).ok_or_else(|| {
                TableError::InvalidSchema(format!("primary column {position} out of bounds"))
            })?;
            let value = row.get(position).ok_or(TableError::RowArity {
                expected: self.schema.columns.len(),
                got: row.len(),
            })?;
            components.push((descriptor, value));
        }
        Ok(encode_composite(&components)?)
    }

    /// Computes the primary key for a fresh insert of `row`.
    fn primary_key_for_insert(&self, row: &[FieldValue]) -> Result<Vec<u8>, TableError> {
        match &self.schema.primary {
            Some(index) => self.primary_key_of(index, row),
            None => {
                let id = self.row_ids.next_id();
                let descriptor = FieldDescriptor::integer(8);
                let value = FieldValue::Integer(id as i64);
                Ok(encode_composite(&[(&descriptor, &value)])?)
            }
        }
    }

    /// Inserts a row, returning its encoded primary key.
    pub fn insert<E: KvEngine>(
        &self,
        txn: &mut TransactionBridge<'_, E>,
        row: &[FieldValue],
    ) -> Result<Vec<u8>, TableError> {
        self.check_arity(row)?;
        let primary_key = self.primary_key_for_insert(row)?;
        let key = row_key(self.schema.table_id, &primary_key);

        if txn.get_for_update(&key)?.is_some() {
            return Err(TableError::DuplicateKey { key: primary_key });
        }

        txn.put(&key, &encode_row(row, &self.schema.columns)?)?;
        for index in &self.schema.secondary {
            self.indexes.insert(txn, index, row, &primary_key)?;
        }
        debug!(table_id = self.schema.table_id, "row inserted");
        Ok(primary_key)
    }

    /// Reads the row stored under an encoded primary key.
    pub fn get<E: KvEngine>(
        &self,
        txn: &mut TransactionBridge<'_, E>,
        primary_key: &[u8],
    ) -> Result<Option<Row>, TableError> {
        let key = row_key(self.schema.table_id, primary_key);
        match txn.get(&key)? {
            Some(blob) => Ok(Some(decode_row(&blob, &self.schema.columns)?)),
            None => Ok(None),
        }
    }

    /// Replaces the row stored under `primary_key` with `new_row`,
    /// returning the (possibly changed) primary key.
    ///
    /// The caller supplies the current row so index maintenance can compute
    /// old secondary keys without a second read. An update that changes the
    /// primary-key columns moves the row record and rewrites every index
    /// entry; one that does not leaves untouched indexes write-free.
    pub fn update<E: KvEngine>(
        &self,
        txn: &mut TransactionBridge<'_, E>,
        primary_key: &[u8],
        old_row: &[FieldValue],
        new_row: &[FieldValue],
    ) -> Result<Vec<u8>, TableError> {
        self.check_arity(old_row)?;
        self.check_arity(new_row)?;

        let old_key = row_key(self.schema.table_id, primary_key);
        if txn.get_for_update(&old_key)?.is_none() {
            return Err(TableError::RowNotFound {
                key: primary_key.to_vec(),
            });
        }

        let new_primary_key = match &self.schema.primary {
            Some(index) => self.primary_key_of(index, new_row)?,
            None => primary_key.to_vec(),
        };
        let blob = encode_row(new_row, &self.schema.columns)?;

        if new_primary_key == primary_key {
            txn.put(&old_key, &blob)?;
            for index in &self.schema.secondary {
                self.indexes
                    .update(txn, index, old_row, new_row, primary_key)?;
            }
        } else {
            let new_key = row_key(self.schema.table_id, &new_primary_key);
            if txn.get_for_update(&new_key)?.is_some() {
                return Err(TableError::DuplicateKey {
                    key: new_primary_key,
                });
            }
            txn.delete(&old_key)?;
            txn.put(&new_key, &blob)?;
            // The primary key itself changed, so every index entry must
            // swap to the new one even where the secondary key is equal.
            for index in &self.schema.secondary {
                self.indexes.delete(txn, index, old_row, primary_key)?;
                self.indexes.insert(txn, index, new_row, &new_primary_key)?;
            }
        }
        debug!(table_id = self.schema.table_id, "row updated");
        Ok(new_primary_key)
    }

    /// Deletes the row stored under `primary_key`.
    ///
    /// The caller supplies the current row so the secondary keys to clean
    /// up can be computed.
    pub fn delete<E: KvEngine>(
        &self,
        txn: &mut TransactionBridge<'_, E>,
        primary_key: &[u8],
        row: &[FieldValue],
    ) -> Result<(), TableError> {
        self.check_arity(row)?;

        let key = row_key(self.schema.table_id, primary_key);
        if txn.get_for_update(&key)?.is_none() {
            return Err(TableError::RowNotFound {
                key: primary_key.to_vec(),
            });
        }

        txn.delete(&key)?;
        for index in &self.schema.secondary {
            self.indexes.delete(txn, index, row, primary_key)?;
        }
        debug!(table_id = self.schema.table_id, "row deleted");
        Ok(())
    }

    /// Starts a full-table scan in primary-key order.
    pub fn scan(&self) -> TableScan {
        let prefix = row_key_prefix(self.schema.table_id);
        let range = build_bounds(&prefix, RangeMode::Prefix);
        TableScan {
            cursor: ScanCursor::new(range),
            columns: self.schema.columns.clone(),
        }
    }

    /// Returns the primary keys of rows whose indexed columns equal
    /// `bound_values`.
    pub fn index_lookup<E: KvEngine>(
        &self,
        txn: &mut TransactionBridge<'_, E>,
        index: &IndexDescriptor,
        bound_values: &[FieldValue],
    ) -> Result<PrimaryKeySet, TableError> {
        Ok(self.indexes.lookup_exact(txn, index, bound_values)?)
    }

    /// Starts an index scan over rows matching the leading `prefix_values`
    /// of the index's columns.
    pub fn index_scan_prefix(
        &self,
        index: &IndexDescriptor,
        prefix_values: &[FieldValue],
    ) -> Result<IndexScan, TableError> {
        Ok(self.indexes.scan_prefix(index, prefix_values)?)
    }
}

/// Incremental scan over a table's rows, in primary-key order.
pub struct TableScan {
    cursor: ScanCursor,
    columns: Vec<FieldDescriptor>,
}

impl TableScan {
    /// Returns up to `max_items` `(primary_key, row)` pairs.
    pub fn next_batch<E: KvEngine>(
        &mut self,
        txn: &mut TransactionBridge<'_, E>,
        max_items: usize,
    ) -> Result<Vec<(Vec<u8>, Row)>, TableError> {
        let raw = self.cursor.next_batch(txn, max_items)?;
        let mut out = Vec::with_capacity(raw.len());
        for (key, blob) in raw {
            let primary_key = key.get(ROW_PREFIX_LEN..).unwrap_or_default().to_vec();
            out.push((primary_key, decode_row(&blob, &self.columns)?));
        }
        Ok(out)
    }

    /// Returns true once the table has been fully scanned.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.cursor.is_exhausted()
    }
}
