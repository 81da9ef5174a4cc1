//! Object: a record owning one or more list properties
//!
//! An object starts unmanaged, holding its lists in memory. Adding it to a
//! database (see [`ObjectStoreExt`](crate::ObjectStoreExt)) copies the lists
//! into storage and yields a managed object bound to the stored record.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use strata_core::{ObjectId, ObjectSchema, PrimitiveValue, StrataResult};
use strata_engine::Database;
use strata_storage::StoredRecord;

use crate::backing::{ListBacking, ManagedBacking, UnmanagedBacking};
use crate::dynamic::DynamicList;
use crate::list::PrimitiveList;

#[derive(Clone)]
pub(crate) enum ObjectState {
    Unmanaged(Arc<RwLock<StoredRecord>>),
    Managed {
        db: Arc<Database>,
        id: ObjectId,
        incarnation: u64,
    },
}

/// Handle to a record of some [`ObjectSchema`]
///
/// Clones refer to the same record.
#[derive(Clone)]
pub struct Object {
    schema: Arc<ObjectSchema>,
    state: ObjectState,
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Object");
        out.field("schema", &self.schema.name());
        match &self.state {
            ObjectState::Unmanaged(_) => out.field("managed", &false),
            ObjectState::Managed { id, incarnation, .. } => out
                .field("managed", &true)
                .field("id", id)
                .field("incarnation", incarnation),
        };
        out.finish()
    }
}

impl Object {
    /// Create an unmanaged object with every list empty
    pub fn new(schema: Arc<ObjectSchema>) -> Self {
        let record = StoredRecord::new(schema.clone());
        Self {
            schema,
            state: ObjectState::Unmanaged(Arc::new(RwLock::new(record))),
        }
    }

    pub(crate) fn managed(
        db: Arc<Database>,
        schema: Arc<ObjectSchema>,
        id: ObjectId,
        incarnation: u64,
    ) -> Self {
        Self {
            schema,
            state: ObjectState::Managed {
                db,
                id,
                incarnation,
            },
        }
    }

    pub(crate) fn state(&self) -> &ObjectState {
        &self.state
    }

    /// Record schema
    pub fn schema(&self) -> &Arc<ObjectSchema> {
        &self.schema
    }

    /// Whether the object is owned by a database
    pub fn is_managed(&self) -> bool {
        matches!(self.state, ObjectState::Managed { .. })
    }

    /// Database id, for managed objects
    pub fn id(&self) -> Option<ObjectId> {
        match &self.state {
            ObjectState::Unmanaged(_) => None,
            ObjectState::Managed { id, .. } => Some(*id),
        }
    }

    /// Whether the managed record was deleted. Never fails.
    pub fn is_invalidated(&self) -> bool {
        match &self.state {
            ObjectState::Unmanaged(_) => false,
            ObjectState::Managed {
                db,
                id,
                incarnation,
            } => !db.is_live(*id, *incarnation),
        }
    }

    fn backing(&self, property: &str) -> StrataResult<Arc<dyn ListBacking>> {
        let kind = self.schema.require_property(property)?.kind;
        Ok(match &self.state {
            ObjectState::Unmanaged(record) => {
                Arc::new(UnmanagedBacking::new(record.clone(), property, kind))
            }
            ObjectState::Managed {
                db,
                id,
                incarnation,
            } => Arc::new(ManagedBacking::new(db.clone(), *id, *incarnation, property, kind)),
        })
    }

    /// Typed handle to a list property
    ///
    /// # Errors
    /// `PropertyNotFound` for an undeclared name, `TypeMismatch` when the
    /// property holds another kind than `T`.
    pub fn list<T: PrimitiveValue>(&self, property: &str) -> StrataResult<PrimitiveList<T>> {
        self.schema.require_kind(property, T::KIND)?;
        Ok(PrimitiveList::from_backing(self.backing(property)?))
    }

    /// Untyped handle to a list property
    pub fn dynamic_list(&self, property: &str) -> StrataResult<DynamicList> {
        Ok(DynamicList::from_backing(self.backing(property)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{PrimitiveKind, StrataError};

    fn schema() -> Arc<ObjectSchema> {
        ObjectSchema::builder("Trip")
            .list("stops", PrimitiveKind::String)
            .list("distances", PrimitiveKind::Float)
            .build()
            .unwrap()
    }

    #[test]
    fn test_lists_of_one_object_share_record() {
        let trip = Object::new(schema());
        trip.list::<String>("stops")
            .unwrap()
            .append("Oslo".to_string())
            .unwrap();
        let again = trip.list::<String>("stops").unwrap();
        assert_eq!(again.to_vec().unwrap(), vec!["Oslo".to_string()]);
        assert!(trip.list::<f32>("distances").unwrap().is_empty().unwrap());
    }

    #[test]
    fn test_unknown_property() {
        let err = Object::new(schema()).list::<String>("nope").unwrap_err();
        assert!(matches!(err, StrataError::PropertyNotFound { .. }));
    }

    #[test]
    fn test_kind_mismatch() {
        let err = Object::new(schema()).list::<f64>("distances").unwrap_err();
        assert!(matches!(
            err,
            StrataError::TypeMismatch {
                expected: PrimitiveKind::Float,
                actual: PrimitiveKind::Double,
                ..
            }
        ));
    }

    #[test]
    fn test_unmanaged_object() {
        let trip = Object::new(schema());
        assert!(!trip.is_managed());
        assert!(!trip.is_invalidated());
        assert_eq!(trip.id(), None);
        assert_eq!(
            trip.dynamic_list("distances").unwrap().kind(),
            PrimitiveKind::Float
        );
    }
}
