//! RAII guard over a write transaction

use std::marker::PhantomData;

use strata_core::StrataResult;
use tracing::warn;

use super::Database;

/// An open write transaction that cancels itself when dropped
///
/// ```
/// use strata_engine::Database;
///
/// let db = Database::open_in_memory();
/// {
///     let _scope = db.write_scope().unwrap();
///     assert!(db.is_in_write_transaction());
/// }
/// assert!(!db.is_in_write_transaction());
/// ```
///
/// The transaction belongs to the thread that opened it, so a scope cannot
/// be sent to another thread:
///
/// ```compile_fail
/// use strata_engine::Database;
///
/// fn require_send<T: Send>(_: T) {}
///
/// let db = Database::open_in_memory();
/// require_send(db.write_scope().unwrap());
/// ```
#[must_use = "dropping a WriteScope cancels its transaction"]
#[derive(Debug)]
pub struct WriteScope<'db> {
    db: &'db Database,
    resolved: bool,
    _thread_bound: PhantomData<*const ()>,
}

impl<'db> WriteScope<'db> {
    pub(super) fn new(db: &'db Database) -> Self {
        Self {
            db,
            resolved: false,
            _thread_bound: PhantomData,
        }
    }

    /// Database the transaction belongs to
    pub fn database(&self) -> &'db Database {
        self.db
    }

    /// Commit and return the store version after commit
    ///
    /// On failure the scope stays unresolved and cancels when dropped.
    pub fn commit(mut self) -> StrataResult<u64> {
        let version = self.db.commit_write()?;
        self.resolved = true;
        Ok(version)
    }

    /// Cancel, reverting every change made in the transaction
    pub fn cancel(mut self) -> StrataResult<()> {
        self.db.cancel_write()?;
        self.resolved = true;
        Ok(())
    }
}

impl Drop for WriteScope<'_> {
    fn drop(&mut self) {
        if self.resolved {
            return;
        }
        warn!(target: "strata::db", "WriteScope dropped without commit, cancelling transaction");
        if let Err(e) = self.db.cancel_write() {
            warn!(target: "strata::db", error = %e, "Implicit cancel failed");
        }
    }
}
