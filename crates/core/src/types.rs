//! Core types for Strata lists
//!
//! This module defines the foundational types:
//! - ObjectId: Identity of a record in the database
//! - PropertySchema: A named list property and its element kind
//! - ObjectSchema: The ordered set of list properties a record type declares

use crate::contract::PrimitiveKind;
use crate::error::{StrataError, StrataResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identity of a record stored in a database
///
/// ObjectIds are allocated by the database when a record is attached and are
/// never reused within one database instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Create from a raw identifier
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw identifier
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A list property declared by a schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySchema {
    /// Property name
    pub name: String,
    /// Element kind of the list
    pub kind: PrimitiveKind,
}

/// Record type: a name plus its list properties in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSchema {
    name: String,
    properties: Vec<PropertySchema>,
}

impl ObjectSchema {
    /// Start building a schema
    ///
    /// ```
    /// use strata_core::{ObjectSchema, PrimitiveKind};
    ///
    /// let schema = ObjectSchema::builder("Measurement")
    ///     .list("samples", PrimitiveKind::Double)
    ///     .list("tags", PrimitiveKind::String)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(schema.property("tags").unwrap().kind, PrimitiveKind::String);
    /// ```
    pub fn builder(name: impl Into<String>) -> ObjectSchemaBuilder {
        ObjectSchemaBuilder {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Anonymous schema holding exactly one list property
    ///
    /// Backs standalone lists that are not owned by any declared record type.
    pub fn single_list(property: &str, kind: PrimitiveKind) -> Arc<ObjectSchema> {
        Arc::new(ObjectSchema {
            name: format!("<{} list>", kind),
            properties: vec![PropertySchema {
                name: property.to_string(),
                kind,
            }],
        })
    }

    /// Schema name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Properties in declaration order
    pub fn properties(&self) -> &[PropertySchema] {
        &self.properties
    }

    /// Look up a property by name
    pub fn property(&self, name: &str) -> Option<&PropertySchema> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Look up a property, failing with `PropertyNotFound`
    pub fn require_property(&self, name: &str) -> StrataResult<&PropertySchema> {
        self.property(name).ok_or_else(|| StrataError::PropertyNotFound {
            object_type: self.name.clone(),
            property: name.to_string(),
        })
    }

    /// Look up a property and check its element kind
    pub fn require_kind(&self, name: &str, kind: PrimitiveKind) -> StrataResult<&PropertySchema> {
        let property = self.require_property(name)?;
        if property.kind != kind {
            return Err(StrataError::TypeMismatch {
                property: name.to_string(),
                expected: property.kind,
                actual: kind,
            });
        }
        Ok(property)
    }
}

/// Builder for [`ObjectSchema`]
#[derive(Debug)]
pub struct ObjectSchemaBuilder {
    name: String,
    properties: Vec<PropertySchema>,
}

impl ObjectSchemaBuilder {
    /// Declare a list property
    pub fn list(mut self, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        self.properties.push(PropertySchema {
            name: name.into(),
            kind,
        });
        self
    }

    /// Finish the schema
    ///
    /// # Errors
    /// `InvalidInput` for an empty schema name, an empty property name or a
    /// property declared twice.
    pub fn build(self) -> StrataResult<Arc<ObjectSchema>> {
        if self.name.is_empty() {
            return Err(StrataError::invalid_input("schema name cannot be empty"));
        }
        for (i, property) in self.properties.iter().enumerate() {
            if property.name.is_empty() {
                return Err(StrataError::invalid_input(format!(
                    "schema '{}' declares a property with an empty name",
                    self.name
                )));
            }
            if self.properties[..i].iter().any(|p| p.name == property.name) {
                return Err(StrataError::invalid_input(format!(
                    "schema '{}' declares property '{}' twice",
                    self.name, property.name
                )));
            }
        }
        Ok(Arc::new(ObjectSchema {
            name: self.name,
            properties: self.properties,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Arc<ObjectSchema> {
        ObjectSchema::builder("Sample")
            .list("ints", PrimitiveKind::Int32)
            .list("names", PrimitiveKind::String)
            .build()
            .unwrap()
    }

    #[test]
    fn test_properties_keep_declaration_order() {
        let schema = sample();
        let names: Vec<_> = schema.properties().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["ints", "names"]);
    }

    #[test]
    fn test_require_property_unknown() {
        let err = sample().require_property("missing").unwrap_err();
        assert!(matches!(err, StrataError::PropertyNotFound { .. }));
    }

    #[test]
    fn test_require_kind_mismatch() {
        let err = sample().require_kind("ints", PrimitiveKind::Int64).unwrap_err();
        match err {
            StrataError::TypeMismatch { expected, actual, .. } => {
                assert_eq!(expected, PrimitiveKind::Int32);
                assert_eq!(actual, PrimitiveKind::Int64);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_property_rejected() {
        let result = ObjectSchema::builder("Dup")
            .list("a", PrimitiveKind::Int)
            .list("a", PrimitiveKind::Double)
            .build();
        assert!(matches!(result, Err(StrataError::InvalidInput { .. })));
    }

    #[test]
    fn test_object_id_display() {
        assert_eq!(ObjectId::new(7).to_string(), "#7");
    }
}
