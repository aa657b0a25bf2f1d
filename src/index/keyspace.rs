// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Key-space layout.
//!
//! Every table's data shares one byte-sorted key space; a one-byte kind
//! tag plus big-endian identifiers keep row records and each index's
//! entries in disjoint, contiguous regions:
//!
//! - Row records:   `[0x01][table_id:u32 BE][encoded primary key]`
//! - Index entries: `[0x02][table_id:u32 BE][index_id:u32 BE][encoded secondary key]`
//!
//! Big-endian identifiers keep each region contiguous under the store's
//! lexicographic comparator, so prefix scans stay within one table or one
//! index.

/// Kind tag for primary row records.
pub const ROW_KEYSPACE: u8 = 0x01;

/// Kind tag for secondary-index entries.
pub const INDEX_KEYSPACE: u8 = 0x02;

/// Byte length of a row-key prefix.
pub const ROW_PREFIX_LEN: usize = 1 + 4;

/// Byte length of an index-key prefix.
pub const INDEX_PREFIX_LEN: usize = 1 + 4 + 4;

/// Returns the key prefix of a table's row records.
pub fn row_key_prefix(table_id: u32) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(ROW_PREFIX_LEN);
    prefix.push(ROW_KEYSPACE);
    prefix.extend_from_slice(&table_id.to_be_bytes());
    prefix
}

/// Returns the full store key of a row record.
pub fn row_key(table_id: u32, primary_key: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(ROW_PREFIX_LEN + primary_key.len());
    key.push(ROW_KEYSPACE);
    key.extend_from_slice(&table_id.to_be_bytes());
    key.extend_from_slice(primary_key);
    key
}

/// Returns the key prefix of one secondary index's entries.
pub fn index_key_prefix(table_id: u32, index_id: u32) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(INDEX_PREFIX_LEN);
    prefix.push(INDEX_KEYSPACE);
    prefix.extend_from_slice(&table_id.to_be_bytes());
    prefix.extend_from_slice(&index_id.to_be_bytes());
    prefix
}

/// Returns the full store key of one secondary-index entry.
pub fn index_key(table_id: u32, index_id: u32, secondary_key: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(INDEX_PREFIX_LEN + secondary_key.len());
    key.push(INDEX_KEYSPACE);
    key.extend_from_slice(&table_id.to_be_bytes());
    key.extend_from_slice(&index_id.to_be_bytes());
    key.extend_from_slice(secondary_key);
    key
}
