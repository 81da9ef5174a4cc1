//! Transaction context for single-writer transactions
//!
//! TransactionContext buffers every record change made inside a write
//! transaction. Reads inside the transaction see its own writes first and
//! fall back to the committed store (read-your-writes). Nothing reaches the
//! store until commit, so abort is simply dropping the overlay.
//!
//! Records are copied into the overlay on first write (copy-on-write).

use std::collections::BTreeMap;

use strata_core::{ObjectId, StrataError, StrataResult};
use strata_storage::{RecordStore, RecordWrite, StoredRecord};

/// Status of a transaction in its lifecycle
///
/// State transitions:
/// - `Active` → `Committed` (commit)
/// - `Active` → `Aborted` (cancel)
///
/// Terminal states (no transitions allowed):
/// - `Committed`
/// - `Aborted`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Transaction is open, can read/write
    Active,
    /// Transaction committed successfully
    Committed,
    /// Transaction was cancelled
    Aborted {
        /// Human-readable reason for abort
        reason: String,
    },
}

/// Summary of pending operations that would be rolled back on abort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PendingOperations {
    /// Records inserted or modified
    pub puts: usize,
    /// Records deleted
    pub deletes: usize,
}

impl PendingOperations {
    /// Total number of pending operations
    pub fn total(&self) -> usize {
        self.puts + self.deletes
    }

    /// Check if there are no pending operations
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Buffered state of one record inside a transaction
#[derive(Debug, Clone, PartialEq)]
enum PendingRecord {
    Written(StoredRecord),
    Deleted,
}

/// Write set of one transaction
#[derive(Debug)]
pub struct TransactionContext {
    txn_id: u64,
    /// Store version observed at begin
    start_version: u64,
    status: TransactionStatus,
    overlay: BTreeMap<ObjectId, PendingRecord>,
}

impl TransactionContext {
    /// Create an active transaction
    pub fn new(txn_id: u64, start_version: u64) -> Self {
        Self {
            txn_id,
            start_version,
            status: TransactionStatus::Active,
            overlay: BTreeMap::new(),
        }
    }

    /// Transaction id
    pub fn txn_id(&self) -> u64 {
        self.txn_id
    }

    /// Store version observed when the transaction began
    pub fn start_version(&self) -> u64 {
        self.start_version
    }

    /// Current status
    pub fn status(&self) -> &TransactionStatus {
        &self.status
    }

    /// Whether the transaction accepts reads and writes
    pub fn is_active(&self) -> bool {
        self.status == TransactionStatus::Active
    }

    fn ensure_active(&self) -> StrataResult<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(StrataError::internal(format!(
                "transaction {} is not active: {:?}",
                self.txn_id, self.status
            )))
        }
    }

    /// Run `f` against the record as this transaction sees it
    pub fn with_record<R>(
        &self,
        store: &RecordStore,
        id: ObjectId,
        f: impl FnOnce(&StoredRecord) -> R,
    ) -> Option<R> {
        match self.overlay.get(&id) {
            Some(PendingRecord::Written(record)) => Some(f(record)),
            Some(PendingRecord::Deleted) => None,
            None => store.with_record(id, f),
        }
    }

    /// Whether the record exists in this transaction's view
    pub fn exists(&self, store: &RecordStore, id: ObjectId) -> bool {
        self.with_record(store, id, |_| ()).is_some()
    }

    /// Mutable access to a record, copying it into the overlay on first write
    pub fn record_mut(&mut self, store: &RecordStore, id: ObjectId) -> StrataResult<&mut StoredRecord> {
        self.ensure_active()?;
        if !self.overlay.contains_key(&id) {
            let committed = store.get(id).ok_or(StrataError::ObjectNotFound { id })?;
            self.overlay.insert(id, PendingRecord::Written(committed));
        }
        match self.overlay.get_mut(&id) {
            Some(PendingRecord::Written(record)) => Ok(record),
            _ => Err(StrataError::ObjectNotFound { id }),
        }
    }

    /// Buffer a new record
    pub fn insert_record(&mut self, id: ObjectId, record: StoredRecord) -> StrataResult<()> {
        self.ensure_active()?;
        self.overlay.insert(id, PendingRecord::Written(record));
        Ok(())
    }

    /// Buffer a record deletion
    pub fn delete_record(&mut self, store: &RecordStore, id: ObjectId) -> StrataResult<()> {
        self.ensure_active()?;
        if !self.exists(store, id) {
            return Err(StrataError::ObjectNotFound { id });
        }
        self.overlay.insert(id, PendingRecord::Deleted);
        Ok(())
    }

    /// Committed records this transaction deletes
    pub fn deleted_committed(&self, store: &RecordStore) -> Vec<ObjectId> {
        self.overlay
            .iter()
            .filter(|(id, pending)| **pending == PendingRecord::Deleted && store.contains(**id))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Pending operations summary
    pub fn pending_operations(&self) -> PendingOperations {
        let mut ops = PendingOperations::default();
        for pending in self.overlay.values() {
            match pending {
                PendingRecord::Written(_) => ops.puts += 1,
                PendingRecord::Deleted => ops.deletes += 1,
            }
        }
        ops
    }

    /// Mark committed and hand out the write batch
    pub fn take_writes(&mut self) -> StrataResult<Vec<(ObjectId, RecordWrite)>> {
        self.ensure_active()?;
        self.status = TransactionStatus::Committed;
        let overlay = std::mem::take(&mut self.overlay);
        Ok(overlay
            .into_iter()
            .map(|(id, pending)| match pending {
                PendingRecord::Written(record) => (id, RecordWrite::Put(record)),
                PendingRecord::Deleted => (id, RecordWrite::Delete),
            })
            .collect())
    }

    /// Mark aborted and discard every buffered change
    pub fn mark_aborted(&mut self, reason: impl Into<String>) -> StrataResult<PendingOperations> {
        self.ensure_active()?;
        let discarded = self.pending_operations();
        self.overlay.clear();
        self.status = TransactionStatus::Aborted {
            reason: reason.into(),
        };
        Ok(discarded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{ObjectSchema, PrimitiveKind, Value};

    fn record() -> StoredRecord {
        let schema = ObjectSchema::builder("R")
            .list("xs", PrimitiveKind::Int32)
            .build()
            .unwrap();
        StoredRecord::new(schema)
    }

    fn committed(store: &RecordStore) -> ObjectId {
        let id = store.allocate_id();
        store.apply([(id, RecordWrite::Put(record()))]);
        id
    }

    #[test]
    fn test_read_your_writes() {
        let store = RecordStore::new();
        let id = committed(&store);
        let mut txn = TransactionContext::new(1, store.version());

        txn.record_mut(&store, id)
            .unwrap()
            .list_mut("xs")
            .unwrap()
            .push(Value::Int32(9));

        let in_txn = txn.with_record(&store, id, |r| r.list("xs").unwrap().len());
        assert_eq!(in_txn, Some(1));
        let committed_len = store.with_record(id, |r| r.list("xs").unwrap().len());
        assert_eq!(committed_len, Some(0), "store must not see uncommitted writes");
    }

    #[test]
    fn test_delete_hides_record() {
        let store = RecordStore::new();
        let id = committed(&store);
        let mut txn = TransactionContext::new(1, store.version());

        txn.delete_record(&store, id).unwrap();
        assert!(!txn.exists(&store, id));
        assert!(store.contains(id));
        assert_eq!(txn.deleted_committed(&store), vec![id]);
        assert!(matches!(
            txn.record_mut(&store, id),
            Err(StrataError::ObjectNotFound { .. })
        ));
    }

    #[test]
    fn test_delete_missing_record_fails() {
        let store = RecordStore::new();
        let mut txn = TransactionContext::new(1, 0);
        let err = txn.delete_record(&store, ObjectId::new(42)).unwrap_err();
        assert!(matches!(err, StrataError::ObjectNotFound { .. }));
    }

    #[test]
    fn test_take_writes_transitions_to_committed() {
        let store = RecordStore::new();
        let mut txn = TransactionContext::new(1, 0);
        let id = store.allocate_id();
        txn.insert_record(id, record()).unwrap();
        assert_eq!(txn.pending_operations(), PendingOperations { puts: 1, deletes: 0 });

        let writes = txn.take_writes().unwrap();
        assert_eq!(writes.len(), 1);
        assert_eq!(txn.status(), &TransactionStatus::Committed);
        assert!(txn.insert_record(id, record()).is_err());
    }

    #[test]
    fn test_abort_discards_overlay() {
        let store = RecordStore::new();
        let id = committed(&store);
        let mut txn = TransactionContext::new(1, 0);
        txn.delete_record(&store, id).unwrap();

        let discarded = txn.mark_aborted("cancelled").unwrap();
        assert_eq!(discarded.deletes, 1);
        assert!(!txn.is_active());
        assert!(txn.mark_aborted("again").is_err());
    }
}
