// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Transaction bridge over one engine transaction.

use tracing::debug;

use crate::codec::KeyRange;
use crate::engine::{KvEngine, KvTransaction};

use super::error::TxnError;

/// Transaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnState {
    NotStarted,
    Active,
    Committed,
    Aborted,
}

/// Commit-time durability fence.
///
/// `Enabled` trades commit latency for a synchronous durability barrier:
/// commit returns only after the engine's write-ahead log is synced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fencing {
    #[default]
    Disabled,
    Enabled,
}

impl Fencing {
    #[inline]
    fn is_enabled(self) -> bool {
        self == Fencing::Enabled
    }
}

/// Wraps one engine transaction for one logical unit of work.
///
/// The engine transaction is begun lazily by the first data operation, so
/// hosts that probe with reads before announcing "start transaction" still
/// land every access in the same transaction. Every operation re-checks the
/// engine's abort flag first: the engine may abort asynchronously relative
/// to any single call, so a prior success never implies the transaction is
/// still viable.
///
/// A bridge is exclusively owned by one execution context and commits at
/// most once; `commit` consumes it. `abort` marks the terminal state and
/// performs engine-side termination exactly once, no matter how often it is
/// called or what failed before.
pub struct TransactionBridge<'e, E: KvEngine> {
    engine: &'e E,
    txn: Option<E::Txn<'e>>,
    state: TxnState,
    fencing: Fencing,
}

impl<'e, E: KvEngine> TransactionBridge<'e, E> {
    /// Creates a bridge with fencing disabled.
    pub fn new(engine: &'e E) -> Self {
        Self::with_fencing(engine, Fencing::Disabled)
    }

    /// Creates a bridge with the given fencing mode.
    ///
    /// One bridge commits at most once, so this is a per-commit choice.
    pub fn with_fencing(engine: &'e E, fencing: Fencing) -> Self {
        Self {
            engine,
            txn: None,
            state: TxnState::NotStarted,
            fencing,
        }
    }

    /// Returns the current state.
    #[inline]
    pub fn state(&self) -> TxnState {
        self.state
    }

    /// Returns true once the transaction is aborted, whether by an explicit
    /// [`abort`](Self::abort) or by the engine.
    pub fn is_aborted(&self) -> bool {
        self.state == TxnState::Aborted
            || self.txn.as_ref().map_or(false, |txn| txn.is_aborted())
    }

    /// Explicitly begins the engine transaction.
    ///
    /// Optional: the first data operation begins one lazily if this was
    /// never called.
    pub fn begin(&mut self) -> Result<(), TxnError> {
        self.ensure_active().map(|_| ())
    }

    /// Begins lazily, then fails fast if the transaction cannot accept
    /// further operations.
    fn ensure_active(&mut self) -> Result<&E::Txn<'e>, TxnError> {
        match self.state {
            TxnState::Committed => return Err(TxnError::AlreadyCommitted),
            TxnState::Aborted => return Err(TxnError::AlreadyAborted),
            TxnState::NotStarted => {
                let txn = self.engine.begin(self.fencing.is_enabled())?;
                self.txn = Some(txn);
                self.state = TxnState::Active;
                debug!(fenced = self.fencing.is_enabled(), "transaction started");
            }
            TxnState::Active => {}
        }

        if self.txn.as_ref().map_or(true, |txn| txn.is_aborted()) {
            // The engine gave up on this transaction behind our back;
            // terminate our side and report it.
            self.abort()?;
            return Err(TxnError::Aborted);
        }
        match self.txn.as_ref() {
            Some(txn) => Ok(txn),
            None => Err(TxnError::AlreadyAborted),
        }
    }

    /// Reads the value stored under `key`.
    pub fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>, TxnError> {
        let txn = self.ensure_active()?;
        Ok(txn.get(key)?)
    }

    /// Reads `key` with an exclusive lock, for read-modify-write.
    pub fn get_for_update(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>, TxnError> {
        let txn = self.ensure_active()?;
        Ok(txn.get_for_update(key)?)
    }

    /// Writes `value` under `key`.
    pub fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), TxnError> {
        let txn = self.ensure_active()?;
        Ok(txn.put(key, value)?)
    }

    /// Removes `key`.
    pub fn delete(&mut self, key: &[u8]) -> Result<(), TxnError> {
        let txn = self.ensure_active()?;
        Ok(txn.delete(key)?)
    }

    /// Returns up to `limit` pairs inside `range`, in key order.
    pub fn scan(
        &mut self,
        range: &KeyRange,
        limit: usize,
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>, TxnError> {
        let txn = self.ensure_active()?;
        Ok(txn.scan(range, limit)?)
    }

    /// Commits the transaction, consuming the bridge.
    ///
    /// With [`Fencing::Enabled`] this blocks until the durability barrier
    /// completes. Committing a bridge whose engine transaction was never
    /// begun is a no-op success.
    pub fn commit(mut self) -> Result<(), TxnError> {
        match self.state {
            TxnState::Committed => return Err(TxnError::AlreadyCommitted),
            TxnState::Aborted => return Err(TxnError::AlreadyAborted),
            TxnState::NotStarted => {
                self.state = TxnState::Committed;
                return Ok(());
            }
            TxnState::Active => {}
        }

        let txn = match self.txn.take() {
            Some(txn) => txn,
            None => return Err(TxnError::AlreadyAborted),
        };
        if txn.is_aborted() {
            txn.rollback()?;
            self.state = TxnState::Aborted;
            return Err(TxnError::Aborted);
        }

        txn.commit()?;
        self.state = TxnState::Committed;
        debug!(fenced = self.fencing.is_enabled(), "transaction committed");
        Ok(())
    }

    /// Aborts the transaction.
    ///
    /// Safe to call repeatedly and after failed operations; the engine-side
    /// rollback happens exactly once.
    pub fn abort(&mut self) -> Result<(), TxnError> {
        if self.state == TxnState::Committed {
            return Err(TxnError::AlreadyCommitted);
        }
        self.state = TxnState::Aborted;
        if let Some(txn) = self.txn.take() {
            txn.rollback()?;
            debug!("transaction aborted");
        }
        Ok(())
    }
}
