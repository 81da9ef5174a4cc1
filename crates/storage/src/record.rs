//! StoredRecord: the list contents of one record
//!
//! A record holds one `Vec<Value>` per list property, aligned with the
//! property order of its [`ObjectSchema`]. Every value in a list has the
//! kind the schema declares for that property.
//!
//! The same type backs unmanaged (detached) objects and records inside the
//! committed store or a transaction overlay.

use std::sync::Arc;

use strata_core::{ObjectSchema, StrataError, StrataResult, Value};

/// List contents of a single record
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    schema: Arc<ObjectSchema>,
    lists: Vec<Vec<Value>>,
    /// Bumped whenever a deleted record is restored, so older handles stay dead
    incarnation: u64,
}

impl StoredRecord {
    /// Create a record with every list empty
    pub fn new(schema: Arc<ObjectSchema>) -> Self {
        let lists = vec![Vec::new(); schema.properties().len()];
        Self {
            schema,
            lists,
            incarnation: 0,
        }
    }

    /// Record schema
    pub fn schema(&self) -> &Arc<ObjectSchema> {
        &self.schema
    }

    /// Current incarnation
    pub fn incarnation(&self) -> u64 {
        self.incarnation
    }

    /// Set the incarnation
    pub fn set_incarnation(&mut self, incarnation: u64) {
        self.incarnation = incarnation;
    }

    fn position(&self, property: &str) -> StrataResult<usize> {
        self.schema
            .properties()
            .iter()
            .position(|p| p.name == property)
            .ok_or_else(|| StrataError::PropertyNotFound {
                object_type: self.schema.name().to_string(),
                property: property.to_string(),
            })
    }

    /// Elements of a list property
    pub fn list(&self, property: &str) -> StrataResult<&[Value]> {
        let pos = self.position(property)?;
        Ok(&self.lists[pos])
    }

    /// Mutable elements of a list property
    ///
    /// Callers are responsible for keeping element kinds consistent with the
    /// schema; the list layer checks kinds before writing.
    pub fn list_mut(&mut self, property: &str) -> StrataResult<&mut Vec<Value>> {
        let pos = self.position(property)?;
        Ok(&mut self.lists[pos])
    }

    /// Replace a list property wholesale, validating element kinds
    pub fn set_list(&mut self, property: &str, values: Vec<Value>) -> StrataResult<()> {
        let pos = self.position(property)?;
        let expected = self.schema.properties()[pos].kind;
        if let Some(bad) = values.iter().find(|v| v.kind() != expected) {
            return Err(StrataError::TypeMismatch {
                property: property.to_string(),
                expected,
                actual: bad.kind(),
            });
        }
        self.lists[pos] = values;
        Ok(())
    }

    /// Total number of elements across all lists
    pub fn element_count(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::PrimitiveKind;

    fn record() -> StoredRecord {
        let schema = ObjectSchema::builder("R")
            .list("a", PrimitiveKind::Int8)
            .list("b", PrimitiveKind::String)
            .build()
            .unwrap();
        StoredRecord::new(schema)
    }

    #[test]
    fn test_new_record_has_empty_lists() {
        let r = record();
        assert!(r.list("a").unwrap().is_empty());
        assert!(r.list("b").unwrap().is_empty());
        assert_eq!(r.element_count(), 0);
        assert_eq!(r.incarnation(), 0);
    }

    #[test]
    fn test_list_mut_writes_through() {
        let mut r = record();
        r.list_mut("a").unwrap().push(Value::Int8(1));
        assert_eq!(r.list("a").unwrap(), &[Value::Int8(1)]);
    }

    #[test]
    fn test_set_list_rejects_wrong_kind() {
        let mut r = record();
        let err = r.set_list("a", vec![Value::Int16(1)]).unwrap_err();
        assert!(matches!(err, StrataError::TypeMismatch { .. }));
        assert!(r.list("a").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_property() {
        assert!(matches!(
            record().list("zzz"),
            Err(StrataError::PropertyNotFound { .. })
        ));
    }
}
