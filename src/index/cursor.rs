// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Resumable batched scans.

use crate::codec::{build_bounds, KeyRange, RangeMode};
use crate::engine::KvEngine;
use crate::txn::{TransactionBridge, TxnError};

/// Stateful cursor over one key range.
///
/// Each call to [`next_batch`](Self::next_batch) resumes strictly after the
/// last key returned, so scans can be consumed incrementally at batch
/// granularity. A returned batch shorter than `max_items` means the range
/// is exhausted; callers should check [`is_exhausted`](Self::is_exhausted)
/// rather than query past the end.
pub struct ScanCursor {
    range: KeyRange,
    last_key: Option<Vec<u8>>,
    exhausted: bool,
}

impl ScanCursor {
    /// Creates a cursor over the given bounds.
    pub fn new(range: KeyRange) -> Self {
        Self {
            range,
            last_key: None,
            exhausted: false,
        }
    }

    /// Returns true once the range has been fully consumed.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Returns up to `max_items` key-value pairs, in key order.
    ///
    /// Entries with empty values are tombstones: skipped transparently and
    /// not counted against `max_items`.
    pub fn next_batch<E: KvEngine>(
        &mut self,
        txn: &mut TransactionBridge<'_, E>,
        max_items: usize,
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>, TxnError> {
        if self.exhausted || max_items == 0 {
            return Ok(Vec::new());
        }

        let mut out = Vec::with_capacity(max_items);
        while out.len() < max_items && !self.exhausted {
            let start = match &self.last_key {
                Some(key) => build_bounds(key, RangeMode::After).start,
                None => self.range.start.clone(),
            };
            let window = KeyRange {
                start,
                end: self.range.end.clone(),
                end_inclusive: self.range.end_inclusive,
            };

            let wanted = max_items - out.len();
            let batch = txn.scan(&window, wanted)?;
            if batch.len() < wanted {
                self.exhausted = true;
            }
            for (key, value) in batch {
                self.last_key = Some(key.clone());
                if value.is_empty() {
                    continue; // tombstone
                }
                out.push((key, value));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::with_upper_bound;
    use crate::engine::RocksEngine;
    use tempfile::TempDir;

    fn create_populated_engine() -> (RocksEngine, TempDir) {
        let dir = TempDir::new().unwrap();
        let engine = RocksEngine::open(dir.path()).unwrap();
        {
            let mut txn = TransactionBridge::new(&engine);
            for i in 0..10u8 {
                txn.put(&[b'k', i], &[i]).unwrap();
            }
            txn.commit().unwrap();
        }
        (engine, dir)
    }

    #[test]
    fn test_batches_resume_without_restarting() {
        let (engine, _dir) = create_populated_engine();
        let mut txn = TransactionBridge::new(&engine);

        let mut cursor = ScanCursor::new(with_upper_bound(b"k", b"l", false));
        let first = cursor.next_batch(&mut txn, 4).unwrap();
        let second = cursor.next_batch(&mut txn, 4).unwrap();
        let third = cursor.next_batch(&mut txn, 4).unwrap();

        assert_eq!(first.len(), 4);
        assert_eq!(second.len(), 4);
        assert_eq!(third.len(), 2, "only the tail remains");
        assert!(cursor.is_exhausted());

        let mut seen: Vec<Vec<u8>> = Vec::new();
        seen.extend(first.into_iter().map(|(k, _)| k));
        seen.extend(second.into_iter().map(|(k, _)| k));
        seen.extend(third.into_iter().map(|(k, _)| k));
        let expected: Vec<Vec<u8>> = (0..10u8).map(|i| vec![b'k', i]).collect();
        assert_eq!(seen, expected, "no key repeated or skipped");
    }

    #[test]
    fn test_short_batch_signals_exhaustion() {
        let (engine, _dir) = create_populated_engine();
        let mut txn = TransactionBridge::new(&engine);

        let mut cursor = ScanCursor::new(with_upper_bound(b"k", b"l", false));
        let batch = cursor.next_batch(&mut txn, 100).unwrap();
        assert_eq!(batch.len(), 10);
        assert!(cursor.is_exhausted());
        assert!(cursor.next_batch(&mut txn, 100).unwrap().is_empty());
    }

    #[test]
    fn test_tombstones_are_skipped() {
        let (engine, _dir) = create_populated_engine();
        {
            let mut txn = TransactionBridge::new(&engine);
            // Empty value = tombstone convention for logically deleted entries.
            txn.put(&[b'k', 3], b"").unwrap();
            txn.put(&[b'k', 7], b"").unwrap();
            txn.commit().unwrap();
        }

        let mut txn = TransactionBridge::new(&engine);
        let mut cursor = ScanCursor::new(with_upper_bound(b"k", b"l", false));
        let batch = cursor.next_batch(&mut txn, 100).unwrap();

        assert_eq!(batch.len(), 8);
        assert!(batch.iter().all(|(key, _)| key[1] != 3 && key[1] != 7));
    }

    #[test]
    fn test_tombstones_do_not_shorten_batches() {
        let (engine, _dir) = create_populated_engine();
        {
            let mut txn = TransactionBridge::new(&engine);
            txn.put(&[b'k', 0], b"").unwrap();
            txn.put(&[b'k', 1], b"").unwrap();
            txn.commit().unwrap();
        }

        let mut txn = TransactionBridge::new(&engine);
        let mut cursor = ScanCursor::new(with_upper_bound(b"k", b"l", false));
        // Two of the first four entries are tombstones; the batch still
        // comes back full because the cursor refills past them.
        let batch = cursor.next_batch(&mut txn, 4).unwrap();
        assert_eq!(batch.len(), 4);
        assert_eq!(batch[0].0, vec![b'k', 2]);
    }

    #[test]
    fn test_empty_range() {
        let (engine, _dir) = create_populated_engine();
        let mut txn = TransactionBridge::new(&engine);

        let mut cursor = ScanCursor::new(with_upper_bound(b"x", b"y", false));
        let batch = cursor.next_batch(&mut txn, 10).unwrap();
        assert!(batch.is_empty());
        assert!(cursor.is_exhausted());
    }
}
