//! Transaction manager for the single-writer write transaction
//!
//! A database has at most one open write transaction. The manager owns that
//! slot and drives its lifecycle against a [`RecordStore`]:
//!
//! ```text
//! begin()  - allocate txn id, open context       (TransactionAlreadyActive if open)
//! ...      - reads/writes go through the context via with_active / with_active_mut
//! commit() - take write batch, apply to store    (NoActiveTransaction if none)
//! abort()  - discard overlay, bump incarnation of committed records it deleted
//! ```
//!
//! The transaction belongs to the thread that began it. Other threads keep
//! reading committed state and cannot write, commit or cancel through it.
//!
//! Lock order is always manager slot first, then store. Commit and abort
//! release the slot before touching the store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, ThreadId};

use parking_lot::Mutex;
use tracing::debug;

use strata_core::{ObjectId, StrataError, StrataResult};
use strata_storage::{RecordStore, StoredRecord};

use crate::transaction::{PendingOperations, TransactionContext};

/// Lifetime counters for observability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransactionStats {
    /// Transactions begun
    pub begun: u64,
    /// Transactions committed
    pub committed: u64,
    /// Transactions aborted
    pub aborted: u64,
}

#[derive(Debug)]
struct ActiveTransaction {
    owner: ThreadId,
    context: TransactionContext,
}

impl ActiveTransaction {
    fn owned_here(&self) -> bool {
        self.owner == thread::current().id()
    }
}

/// Owns the write-transaction slot of one database
#[derive(Debug)]
pub struct TransactionManager {
    active: Mutex<Option<ActiveTransaction>>,
    /// Next transaction ID
    next_txn_id: AtomicU64,
    begun: AtomicU64,
    committed: AtomicU64,
    aborted: AtomicU64,
}

impl TransactionManager {
    /// Create a manager with no open transaction
    pub fn new() -> Self {
        Self {
            active: Mutex::new(None),
            next_txn_id: AtomicU64::new(1),
            begun: AtomicU64::new(0),
            committed: AtomicU64::new(0),
            aborted: AtomicU64::new(0),
        }
    }

    /// Open the write transaction
    ///
    /// # Errors
    /// `TransactionAlreadyActive` when one is already open.
    pub fn begin(&self, store: &RecordStore) -> StrataResult<u64> {
        let mut slot = self.active.lock();
        if slot.is_some() {
            return Err(StrataError::TransactionAlreadyActive);
        }
        let txn_id = self.next_txn_id.fetch_add(1, Ordering::SeqCst);
        let start_version = store.version();
        *slot = Some(ActiveTransaction {
            owner: thread::current().id(),
            context: TransactionContext::new(txn_id, start_version),
        });
        self.begun.fetch_add(1, Ordering::Relaxed);
        debug!(target: "strata::txn", txn_id, start_version, "Transaction started");
        Ok(txn_id)
    }

    /// Whether a write transaction is open on any thread
    pub fn is_active(&self) -> bool {
        self.active.lock().is_some()
    }

    /// Whether the calling thread owns the open write transaction
    pub fn is_active_on_current_thread(&self) -> bool {
        self.active
            .lock()
            .as_ref()
            .map_or(false, ActiveTransaction::owned_here)
    }

    /// Id of the open transaction, if any
    pub fn active_txn_id(&self) -> Option<u64> {
        self.active.lock().as_ref().map(|a| a.context.txn_id())
    }

    /// Run `f` against the open transaction
    ///
    /// Returns `None` when the calling thread has no open transaction. `f`
    /// must not call back into this manager.
    pub fn with_active<R>(&self, f: impl FnOnce(&TransactionContext) -> R) -> Option<R> {
        match self.active.lock().as_ref() {
            Some(active) if active.owned_here() => Some(f(&active.context)),
            _ => None,
        }
    }

    /// Run `f` against the open transaction mutably
    ///
    /// Returns `None` when the calling thread has no open transaction.
    pub fn with_active_mut<R>(&self, f: impl FnOnce(&mut TransactionContext) -> R) -> Option<R> {
        match self.active.lock().as_mut() {
            Some(active) if active.owned_here() => Some(f(&mut active.context)),
            _ => None,
        }
    }

    /// Run `f` against a record as the calling thread sees it
    ///
    /// The owner of the open transaction sees its overlay, every other caller
    /// sees committed state.
    pub fn with_visible_record<R>(
        &self,
        store: &RecordStore,
        id: ObjectId,
        f: impl FnOnce(&StoredRecord) -> R,
    ) -> Option<R> {
        match self.active.lock().as_ref() {
            Some(active) if active.owned_here() => active.context.with_record(store, id, f),
            _ => store.with_record(id, f),
        }
    }

    fn take_owned(&self, operation: &'static str) -> StrataResult<TransactionContext> {
        let mut slot = self.active.lock();
        match slot.as_ref() {
            Some(active) if active.owned_here() => {}
            _ => return Err(StrataError::NoActiveTransaction { operation }),
        }
        slot.take()
            .map(|active| active.context)
            .ok_or(StrataError::NoActiveTransaction { operation })
    }

    /// Commit the open transaction into `store`
    ///
    /// Returns the store version after commit. A transaction without writes
    /// does not advance the version.
    pub fn commit(&self, store: &RecordStore) -> StrataResult<u64> {
        let mut txn = self.take_owned("commit")?;
        let txn_id = txn.txn_id();
        let writes = txn.take_writes()?;
        let write_count = writes.len();
        let version = store.apply(writes);
        self.committed.fetch_add(1, Ordering::Relaxed);
        debug!(target: "strata::txn", txn_id, version, write_count, "Transaction committed");
        Ok(version)
    }

    /// Abort the open transaction
    ///
    /// Committed records the transaction had deleted get a new incarnation,
    /// so handles that observed the deletion stay invalidated.
    pub fn abort(&self, store: &RecordStore, reason: &str) -> StrataResult<PendingOperations> {
        let mut txn = self.take_owned("cancel")?;
        let txn_id = txn.txn_id();
        let resurrected = txn.deleted_committed(store);
        let discarded = txn.mark_aborted(reason)?;
        for id in &resurrected {
            store.bump_incarnation(*id);
        }
        self.aborted.fetch_add(1, Ordering::Relaxed);
        debug!(
            target: "strata::txn",
            txn_id,
            reason,
            puts = discarded.puts,
            deletes = discarded.deletes,
            "Transaction aborted"
        );
        Ok(discarded)
    }

    /// Lifetime counters
    pub fn stats(&self) -> TransactionStats {
        TransactionStats {
            begun: self.begun.load(Ordering::Relaxed),
            committed: self.committed.load(Ordering::Relaxed),
            aborted: self.aborted.load(Ordering::Relaxed),
        }
    }
}

impl Default for TransactionManager {
    fn default() -> Self {
        Self::new()
    }
}
