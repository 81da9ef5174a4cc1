//! Database extension traits for objects
//!
//! ## Design Principle
//!
//! The engine stores plain records and knows nothing about [`Object`]
//! handles. Extension traits add object-level operations to the database
//! handle without the engine depending on this crate.
//!
//! ## Usage
//!
//! ```
//! use strata_core::{ObjectSchema, PrimitiveKind};
//! use strata_engine::Database;
//! use strata_primitives::{Object, ObjectStoreExt};
//!
//! let schema = ObjectSchema::builder("Playlist")
//!     .list("tracks", PrimitiveKind::String)
//!     .build()
//!     .unwrap();
//! let db = Database::open_in_memory();
//!
//! let playlist = db.write(|| db.add(Object::new(schema.clone()))).unwrap();
//! assert!(playlist.is_managed());
//!
//! db.write(|| db.delete(&playlist)).unwrap();
//! assert!(playlist.is_invalidated());
//! ```
//!
//! ## Implementation Note
//!
//! Extension traits DELEGATE to the engine's record API. Transaction rules,
//! liveness and list length limits are enforced there, not here.

use std::sync::Arc;

use strata_core::{ObjectId, ObjectSchema, StrataError, StrataResult};
use strata_engine::Database;

use crate::object::{Object, ObjectState};

/// Object operations on a database handle
pub trait ObjectStoreExt {
    /// Store an unmanaged object and return its managed counterpart
    ///
    /// The unmanaged object is left untouched; later changes to it are not
    /// seen by the stored record. Adding an object already managed by this
    /// database returns it unchanged.
    ///
    /// # Errors
    /// `NoActiveTransaction` outside a write transaction, `AlreadyManaged`
    /// for an object of another database, `ObjectNotFound` for a deleted
    /// object of this database, `LimitExceeded` when a list is longer than
    /// `max_list_length`.
    fn add(&self, object: Object) -> StrataResult<Object>;

    /// Delete a managed object, invalidating every handle bound to it
    fn delete(&self, object: &Object) -> StrataResult<()>;

    /// Fresh handle to a stored object, `None` if no such record is visible
    fn object(&self, schema: &Arc<ObjectSchema>, id: ObjectId) -> StrataResult<Option<Object>>;
}

impl ObjectStoreExt for Arc<Database> {
    fn add(&self, object: Object) -> StrataResult<Object> {
        match object.state() {
            ObjectState::Managed { db, id, .. } if Arc::ptr_eq(db, self) => {
                if object.is_invalidated() {
                    return Err(StrataError::ObjectNotFound { id: *id });
                }
                Ok(object)
            }
            ObjectState::Managed { .. } => Err(StrataError::AlreadyManaged),
            ObjectState::Unmanaged(record) => {
                let contents = record.read().clone();
                let id = self.insert_record(contents)?;
                let incarnation = self
                    .record_incarnation(id)
                    .ok_or(StrataError::ObjectNotFound { id })?;
                Ok(Object::managed(
                    self.clone(),
                    object.schema().clone(),
                    id,
                    incarnation,
                ))
            }
        }
    }

    fn delete(&self, object: &Object) -> StrataResult<()> {
        match object.state() {
            ObjectState::Managed {
                db,
                id,
                incarnation,
            } if Arc::ptr_eq(db, self) => self.delete_record(*id, *incarnation),
            ObjectState::Managed { .. } => Err(StrataError::invalid_input(
                "object belongs to another database",
            )),
            ObjectState::Unmanaged(_) => Err(StrataError::invalid_input(
                "cannot delete an object that is not managed",
            )),
        }
    }

    fn object(&self, schema: &Arc<ObjectSchema>, id: ObjectId) -> StrataResult<Option<Object>> {
        let Some(stored) = self.record_schema(id) else {
            return Ok(None);
        };
        if stored.name() != schema.name() {
            return Err(StrataError::invalid_input(format!(
                "object {} has type '{}', not '{}'",
                id,
                stored.name(),
                schema.name()
            )));
        }
        let incarnation = self
            .record_incarnation(id)
            .ok_or(StrataError::ObjectNotFound { id })?;
        Ok(Some(Object::managed(self.clone(), stored, id, incarnation)))
    }
}
