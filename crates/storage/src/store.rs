//! RecordStore: committed record storage with version management
//!
//! This module holds the durable side of the database:
//! - `BTreeMap<ObjectId, StoredRecord>` for ordered record storage
//! - `parking_lot::RwLock` for thread-safe access
//! - `AtomicU64` counters for the commit version and id allocation
//!
//! # Design Notes
//!
//! - **Committed state only**: uncommitted changes live in a transaction
//!   overlay and reach this store through [`RecordStore::apply`]
//! - **All-or-nothing apply**: a write batch is applied under a single write lock
//! - **Ids are never reused**: the allocator only moves forward

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::trace;

use strata_core::ObjectId;

use crate::record::StoredRecord;

/// One pending change to a record
#[derive(Debug, Clone, PartialEq)]
pub enum RecordWrite {
    /// Insert or replace the record
    Put(StoredRecord),
    /// Remove the record
    Delete,
}

/// Committed record storage
#[derive(Debug)]
pub struct RecordStore {
    records: RwLock<BTreeMap<ObjectId, StoredRecord>>,
    /// Commit version, incremented once per applied batch
    version: AtomicU64,
    next_id: AtomicU64,
}

impl RecordStore {
    /// Create an empty store at version 0
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            version: AtomicU64::new(0),
            next_id: AtomicU64::new(1),
        }
    }

    /// Allocate a fresh object id
    pub fn allocate_id(&self) -> ObjectId {
        ObjectId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Current commit version
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Whether a committed record exists
    pub fn contains(&self, id: ObjectId) -> bool {
        self.records.read().contains_key(&id)
    }

    /// Run `f` against a committed record without cloning it
    pub fn with_record<R>(&self, id: ObjectId, f: impl FnOnce(&StoredRecord) -> R) -> Option<R> {
        let records = self.records.read();
        records.get(&id).map(f)
    }

    /// Clone a committed record
    pub fn get(&self, id: ObjectId) -> Option<StoredRecord> {
        self.with_record(id, StoredRecord::clone)
    }

    /// Number of committed records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Committed ids in ascending order
    pub fn ids(&self) -> Vec<ObjectId> {
        self.records.read().keys().copied().collect()
    }

    /// Visit every committed record under one read lock, in id order
    pub fn for_each(&self, mut f: impl FnMut(ObjectId, &StoredRecord)) {
        let records = self.records.read();
        for (id, record) in records.iter() {
            f(*id, record);
        }
    }

    /// Apply a write batch atomically and return the new commit version
    ///
    /// An empty batch does not advance the version.
    pub fn apply<I>(&self, writes: I) -> u64
    where
        I: IntoIterator<Item = (ObjectId, RecordWrite)>,
    {
        let mut records = self.records.write();
        let mut applied = 0usize;
        for (id, write) in writes {
            match write {
                RecordWrite::Put(record) => {
                    records.insert(id, record);
                }
                RecordWrite::Delete => {
                    records.remove(&id);
                }
            }
            applied += 1;
        }
        if applied == 0 {
            return self.version();
        }
        let version = self.version.fetch_add(1, Ordering::AcqRel) + 1;
        trace!(target: "strata::storage", version, applied, "Applied write batch");
        version
    }

    /// Advance a committed record's incarnation
    ///
    /// Returns the new incarnation, or `None` if the record does not exist.
    pub fn bump_incarnation(&self, id: ObjectId) -> Option<u64> {
        let mut records = self.records.write();
        records.get_mut(&id).map(|record| {
            let next = record.incarnation() + 1;
            record.set_incarnation(next);
            next
        })
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{ObjectSchema, PrimitiveKind, Value};

    fn record_with(values: Vec<Value>) -> StoredRecord {
        let schema = ObjectSchema::builder("R")
            .list("xs", PrimitiveKind::Int64)
            .build()
            .unwrap();
        let mut record = StoredRecord::new(schema);
        record.set_list("xs", values).unwrap();
        record
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let store = RecordStore::new();
        let a = store.allocate_id();
        let b = store.allocate_id();
        assert!(b > a);
    }

    #[test]
    fn test_apply_put_then_delete() {
        let store = RecordStore::new();
        let id = store.allocate_id();

        let v1 = store.apply([(id, RecordWrite::Put(record_with(vec![Value::Int64(1)])))]);
        assert_eq!(v1, 1);
        assert!(store.contains(id));
        let len = store.with_record(id, |r| r.list("xs").unwrap().len());
        assert_eq!(len, Some(1));

        let v2 = store.apply([(id, RecordWrite::Delete)]);
        assert_eq!(v2, 2);
        assert!(!store.contains(id));
        assert!(store.is_empty());
    }

    #[test]
    fn test_empty_batch_keeps_version() {
        let store = RecordStore::new();
        assert_eq!(store.apply(Vec::new()), 0);
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_bump_incarnation() {
        let store = RecordStore::new();
        let id = store.allocate_id();
        assert_eq!(store.bump_incarnation(id), None);
        store.apply([(id, RecordWrite::Put(record_with(Vec::new())))]);
        assert_eq!(store.bump_incarnation(id), Some(1));
        assert_eq!(store.get(id).unwrap().incarnation(), 1);
    }
}
