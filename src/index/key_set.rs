// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Primary-key set values.
//!
//! The value stored under a secondary-index key is the set of primary keys
//! whose rows currently carry that key. Encoded as a sorted sequence of
//! `[len:u32 BE][key bytes]` entries; sorting makes identical sets encode
//! to identical bytes.

use std::collections::BTreeSet;

use crate::codec::CodecError;

/// The set of encoded primary keys stored under one secondary-index key.
pub type PrimaryKeySet = BTreeSet<Vec<u8>>;

/// Encodes a primary-key set into its stored value.
pub fn encode_key_set(set: &PrimaryKeySet) -> Vec<u8> {
    let total: usize = set.iter().map(|key| 4 + key.len()).sum();
    let mut out = Vec::with_capacity(total);
    for key in set {
        out.extend_from_slice(&(key.len() as u32).to_be_bytes());
        out.extend_from_slice(key);
    }
    out
}

/// Decodes a stored value back into a primary-key set.
pub fn decode_key_set(bytes: &[u8]) -> Result<PrimaryKeySet, CodecError> {
    let mut set = PrimaryKeySet::new();
    let mut offset = 0;
    while offset < bytes.len() {
        if offset + 4 > bytes.len() {
            return Err(CodecError::Corruption(
                "primary-key set entry length truncated".to_string(),
            ));
        }
        let len = u32::from_be_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ]) as usize;
        offset += 4;
        if offset + len > bytes.len() {
            return Err(CodecError::Corruption(format!(
                "primary-key set entry of {len} bytes points past the buffer"
            )));
        }
        set.insert(bytes[offset..offset + len].to_vec());
        offset += len;
    }
    Ok(set)
}
