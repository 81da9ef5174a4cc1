//! Database struct and transaction API
//!
//! This module provides the main Database struct that orchestrates:
//! - Committed record storage
//! - The single write transaction
//! - Liveness and limit checks for list access
//!
//! ## Transaction API
//!
//! The Database provides three ways to run a write transaction:
//!
//! 1. **Closure API** (recommended): `db.write(|| { ... })`
//!    - Automatic commit on success, cancel on error
//!    - Returns the closure's return value
//!
//! 2. **Scoped API**: `let scope = db.write_scope()?; ...; scope.commit()?`
//!    - Cancels when dropped unresolved
//!
//! 3. **Manual API**: `begin_write()` + `commit_write()` / `cancel_write()`
//!
//! With `strict_transactions = false`, a mutation made outside a transaction
//! runs in an implicit transaction of its own.

pub mod config;
mod scope;

pub use config::{DatabaseConfig, CONFIG_FILE_NAME};
pub use scope::WriteScope;

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use strata_concurrency::{TransactionManager, TransactionStats};
use strata_core::{ObjectId, ObjectSchema, StrataError, StrataResult, Value};
use strata_storage::{RecordStore, StoredRecord};
use tracing::{debug, info, trace, warn};

/// In-process list database
///
/// Shared as `Arc<Database>`; managed list handles keep the database alive.
#[derive(Debug)]
pub struct Database {
    config: RwLock<DatabaseConfig>,
    store: RecordStore,
    txns: TransactionManager,
}

impl Database {
    // ========================================================================
    // Open
    // ========================================================================

    /// Open an empty database with the given configuration
    ///
    /// # Errors
    /// `InvalidInput` when the configuration does not validate.
    pub fn open(config: DatabaseConfig) -> StrataResult<Arc<Self>> {
        config.validate()?;
        info!(
            target: "strata::db",
            name = %config.name,
            max_list_length = ?config.max_list_length,
            strict_transactions = config.strict_transactions,
            "Opened database"
        );
        Ok(Arc::new(Self {
            config: RwLock::new(config),
            store: RecordStore::new(),
            txns: TransactionManager::new(),
        }))
    }

    /// Open an empty database configured from a TOML file
    pub fn open_with_config_file(path: &Path) -> StrataResult<Arc<Self>> {
        Self::open(DatabaseConfig::from_file(path)?)
    }

    /// Open an empty database with default configuration
    pub fn open_in_memory() -> Arc<Self> {
        let config = DatabaseConfig::default();
        info!(target: "strata::db", name = %config.name, "Opened in-memory database");
        Arc::new(Self {
            config: RwLock::new(config),
            store: RecordStore::new(),
            txns: TransactionManager::new(),
        })
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Current configuration
    pub fn config(&self) -> DatabaseConfig {
        self.config.read().clone()
    }

    /// Update the configuration in place
    ///
    /// The update is rolled back if the result does not validate.
    pub fn update_config<F: FnOnce(&mut DatabaseConfig)>(&self, f: F) -> StrataResult<()> {
        let mut guard = self.config.write();
        let previous = guard.clone();
        f(&mut guard);
        if let Err(e) = guard.validate() {
            *guard = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Fail with `LimitExceeded` if a list of `property` may not reach `new_len`
    pub fn check_list_capacity(&self, property: &str, new_len: usize) -> StrataResult<()> {
        match self.config.read().max_list_length {
            Some(limit) if new_len > limit => Err(StrataError::LimitExceeded {
                property: property.to_string(),
                limit,
            }),
            _ => Ok(()),
        }
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Open the write transaction on the calling thread
    ///
    /// # Errors
    /// `TransactionAlreadyActive` while any write transaction is open.
    pub fn begin_write(&self) -> StrataResult<()> {
        self.txns.begin(&self.store).map(|_| ())
    }

    /// Commit the calling thread's write transaction
    ///
    /// Returns the store version after commit.
    pub fn commit_write(&self) -> StrataResult<u64> {
        self.txns.commit(&self.store)
    }

    /// Cancel the calling thread's write transaction, reverting every change
    pub fn cancel_write(&self) -> StrataResult<()> {
        self.txns.abort(&self.store, "cancelled").map(|_| ())
    }

    /// Whether the calling thread has an open write transaction
    pub fn is_in_write_transaction(&self) -> bool {
        self.txns.is_active_on_current_thread()
    }

    /// Open a write transaction guarded by a [`WriteScope`]
    pub fn write_scope(&self) -> StrataResult<WriteScope<'_>> {
        self.begin_write()?;
        Ok(WriteScope::new(self))
    }

    /// Run `f` inside a write transaction
    ///
    /// Commits when `f` returns `Ok`, cancels when it returns `Err` or panics.
    ///
    /// ```
    /// use strata_engine::Database;
    ///
    /// let db = Database::open_in_memory();
    /// let answer = db.write(|| Ok(42)).unwrap();
    /// assert_eq!(answer, 42);
    /// assert!(!db.is_in_write_transaction());
    /// ```
    pub fn write<F, T>(&self, f: F) -> StrataResult<T>
    where
        F: FnOnce() -> StrataResult<T>,
    {
        let scope = self.write_scope()?;
        match f() {
            Ok(value) => {
                scope.commit()?;
                Ok(value)
            }
            Err(e) => {
                if let Err(cancel_err) = scope.cancel() {
                    warn!(target: "strata::db", error = %cancel_err, "Failed to cancel write transaction");
                }
                Err(e)
            }
        }
    }

    /// Committed store version
    pub fn version(&self) -> u64 {
        self.store.version()
    }

    /// Transaction counters
    pub fn transaction_stats(&self) -> TransactionStats {
        self.txns.stats()
    }

    // ========================================================================
    // Records
    // ========================================================================

    fn require_write(&self, operation: &'static str) -> StrataResult<()> {
        if self.is_in_write_transaction() {
            Ok(())
        } else {
            Err(StrataError::NoActiveTransaction { operation })
        }
    }

    fn auto_commit(&self) -> bool {
        !self.is_in_write_transaction() && !self.config.read().strict_transactions
    }

    /// Attach a record and return its new id
    ///
    /// Every list of the record must respect `max_list_length`.
    pub fn insert_record(&self, mut record: StoredRecord) -> StrataResult<ObjectId> {
        if self.auto_commit() {
            return self.write(|| self.insert_record(record));
        }
        self.require_write("add an object")?;
        for property in record.schema().properties() {
            self.check_list_capacity(&property.name, record.list(&property.name)?.len())?;
        }
        record.set_incarnation(0);
        let id = self.store.allocate_id();
        let schema = record.schema().name().to_string();
        self.txns
            .with_active_mut(|txn| txn.insert_record(id, record))
            .unwrap_or(Err(StrataError::NoActiveTransaction { operation: "add an object" }))?;
        debug!(target: "strata::db", %id, schema = %schema, "Inserted record");
        Ok(id)
    }

    /// Delete a live record
    ///
    /// Every handle bound to the record becomes invalidated.
    pub fn delete_record(&self, id: ObjectId, incarnation: u64) -> StrataResult<()> {
        if !self.is_live(id, incarnation) {
            return Err(StrataError::ObjectNotFound { id });
        }
        if self.auto_commit() {
            return self.write(|| self.delete_record(id, incarnation));
        }
        self.require_write("delete an object")?;
        self.txns
            .with_active_mut(|txn| txn.delete_record(&self.store, id))
            .unwrap_or(Err(StrataError::NoActiveTransaction { operation: "delete an object" }))?;
        debug!(target: "strata::db", %id, "Deleted record");
        Ok(())
    }

    /// Current incarnation of a record as the calling thread sees it
    pub fn record_incarnation(&self, id: ObjectId) -> Option<u64> {
        self.txns
            .with_visible_record(&self.store, id, StoredRecord::incarnation)
    }

    /// Schema of a record as the calling thread sees it
    pub fn record_schema(&self, id: ObjectId) -> Option<Arc<ObjectSchema>> {
        self.txns
            .with_visible_record(&self.store, id, |record| record.schema().clone())
    }

    /// Whether the record exists and still has the given incarnation
    pub fn is_live(&self, id: ObjectId, incarnation: u64) -> bool {
        self.record_incarnation(id) == Some(incarnation)
    }

    /// Number of committed records
    pub fn record_count(&self) -> usize {
        self.store.len()
    }

    /// Total number of committed list elements across all records
    pub fn element_count(&self) -> usize {
        let mut total = 0;
        self.store.for_each(|_, record| total += record.element_count());
        total
    }

    // ========================================================================
    // List access
    // ========================================================================

    /// Run `f` over the elements of a managed list
    ///
    /// # Errors
    /// `Invalidated` when the record was deleted or re-incarnated.
    pub fn read_list<R>(
        &self,
        id: ObjectId,
        incarnation: u64,
        property: &str,
        f: impl FnOnce(&[Value]) -> R,
    ) -> StrataResult<R> {
        let visible = self.txns.with_visible_record(&self.store, id, |record| {
            if record.incarnation() != incarnation {
                return None;
            }
            Some(record.list(property).map(f))
        });
        match visible.flatten() {
            Some(result) => result,
            None => {
                trace!(target: "strata::db", %id, property, "List access on invalidated record");
                Err(StrataError::invalidated(property))
            }
        }
    }

    /// Run `f` over the mutable elements of a managed list
    ///
    /// Liveness is checked before the transaction rule. `f` must validate its
    /// arguments before changing the list; its error is returned as-is.
    pub fn write_list<R>(
        &self,
        id: ObjectId,
        incarnation: u64,
        property: &str,
        operation: &'static str,
        f: impl FnOnce(&mut Vec<Value>) -> StrataResult<R>,
    ) -> StrataResult<R> {
        if !self.is_live(id, incarnation) {
            trace!(target: "strata::db", %id, property, "List write on invalidated record");
            return Err(StrataError::invalidated(property));
        }
        if self.auto_commit() {
            return self.write(|| self.write_list(id, incarnation, property, operation, f));
        }
        self.require_write(operation)?;
        self.txns
            .with_active_mut(|txn| {
                let record = txn.record_mut(&self.store, id)?;
                f(record.list_mut(property)?)
            })
            .unwrap_or(Err(StrataError::NoActiveTransaction { operation }))
    }
}
