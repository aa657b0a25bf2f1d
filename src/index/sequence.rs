// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Hidden primary-key generation.

use std::sync::atomic::{AtomicU64, Ordering};

/// Source of surrogate primary keys for tables without an explicit one.
///
/// Injected into the table adapter rather than baked in, so deployments
/// that need monotonicity across restarts can supply a durably-persisted
/// generator. This is the only process-wide shared mutable state outside
/// the engine.
pub trait RowIdSequence: Send + Sync {
    /// Returns the next surrogate key. Must never repeat within one
    /// process lifetime.
    fn next_id(&self) -> u64;
}

/// In-memory atomic sequence.
///
/// Restarts at its seed every process start: ids are only monotonic across
/// restarts if the caller re-seeds it above every previously issued id
/// (for example from the maximum stored hidden key). Without that, a
/// restarted process can reissue ids.
pub struct AtomicRowIdSequence {
    next: AtomicU64,
}

impl AtomicRowIdSequence {
    /// Creates a sequence starting at 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Creates a sequence whose first id is `seed`.
    pub fn starting_at(seed: u64) -> Self {
        Self {
            next: AtomicU64::new(seed),
        }
    }
}

impl Default for AtomicRowIdSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl RowIdSequence for AtomicRowIdSequence {
    fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}
