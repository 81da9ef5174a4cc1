//! Error types for Strata lists
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! All errors are raised synchronously at the offending call and are never
//! retried internally. Validation always happens before any structural change,
//! so an error never leaves a list partially mutated.

use crate::contract::PrimitiveKind;
use crate::types::ObjectId;
use std::io;
use thiserror::Error;

/// Result type alias for Strata operations
pub type StrataResult<T> = std::result::Result<T, StrataError>;

/// Error types for the Strata list database
#[derive(Debug, Error)]
pub enum StrataError {
    /// Index at or past the end of the valid range
    ///
    /// `len` is the exclusive upper bound that applied to the call: the element
    /// count for reads, the element count plus one for inserts.
    #[error("Index {index} is out of bounds (must be less than {len})")]
    IndexOutOfBounds {
        /// Offending index
        index: usize,
        /// Exclusive upper bound of the valid range
        len: usize,
    },

    /// Negative index argument
    #[error("Cannot pass a negative value {index} as an index")]
    NegativeIndex {
        /// Offending index
        index: i64,
    },

    /// Access to a managed list whose owning record was deleted
    #[error("List '{property}' is invalidated: its owning object was deleted")]
    Invalidated {
        /// Property the list is bound to
        property: String,
    },

    /// Operation not defined for the element kind
    #[error("Operation '{operation}' is not supported for {kind} lists")]
    UnsupportedOperation {
        /// Operation name
        operation: &'static str,
        /// Element kind of the list
        kind: PrimitiveKind,
    },

    /// Managed mutation outside a write transaction
    #[error("Cannot {operation} outside of a write transaction")]
    NoActiveTransaction {
        /// What the caller attempted
        operation: &'static str,
    },

    /// A write transaction is already open on this database
    #[error("A write transaction is already in progress")]
    TransactionAlreadyActive,

    /// Record does not exist in storage
    #[error("Object {id} not found")]
    ObjectNotFound {
        /// Record identifier
        id: ObjectId,
    },

    /// Property name unknown to the schema
    #[error("Property '{property}' does not exist on object type '{object_type}'")]
    PropertyNotFound {
        /// Schema name
        object_type: String,
        /// Requested property
        property: String,
    },

    /// Value or handle kind does not match the declared property kind
    #[error("Type mismatch for '{property}': expected {expected}, got {actual}")]
    TypeMismatch {
        /// Property involved
        property: String,
        /// Declared kind
        expected: PrimitiveKind,
        /// Kind supplied
        actual: PrimitiveKind,
    },

    /// Object is already attached to a database
    #[error("Object is already managed by a database")]
    AlreadyManaged,

    /// List would grow past the configured maximum length
    #[error("List '{property}' cannot hold more than {limit} elements")]
    LimitExceeded {
        /// Property involved
        property: String,
        /// Configured maximum
        limit: usize,
    },

    /// Invalid input (configuration, arguments)
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of the problem
        message: String,
    },

    /// I/O error (configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Internal invariant broken
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the problem
        message: String,
    },
}

impl StrataError {
    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        StrataError::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        StrataError::Internal {
            message: message.into(),
        }
    }

    /// Create an invalidated error for a property
    pub fn invalidated(property: impl Into<String>) -> Self {
        StrataError::Invalidated {
            property: property.into(),
        }
    }

    /// Whether this is an index validation failure (out of bounds or negative)
    pub fn is_index_error(&self) -> bool {
        matches!(
            self,
            StrataError::IndexOutOfBounds { .. } | StrataError::NegativeIndex { .. }
        )
    }

    /// Whether this is an invalidation failure
    pub fn is_invalidated(&self) -> bool {
        matches!(self, StrataError::Invalidated { .. })
    }

    /// Whether this is a missing-transaction failure
    pub fn is_no_transaction(&self) -> bool {
        matches!(self, StrataError::NoActiveTransaction { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_names_index() {
        let err = StrataError::IndexOutOfBounds { index: 3, len: 3 };
        assert_eq!(err.to_string(), "Index 3 is out of bounds (must be less than 3)");
        assert!(err.is_index_error());
    }

    #[test]
    fn test_negative_index_message() {
        let err = StrataError::NegativeIndex { index: -1 };
        let msg = err.to_string();
        assert!(msg.contains("negative value"));
        assert!(msg.contains("-1"));
        assert!(err.is_index_error());
    }

    #[test]
    fn test_invalidated_is_not_index_error() {
        let err = StrataError::invalidated("int");
        assert!(err.is_invalidated());
        assert!(!err.is_index_error());
        assert!(err.to_string().contains("'int'"));
    }

    #[test]
    fn test_unsupported_operation_names_kind() {
        let err = StrataError::UnsupportedOperation {
            operation: "min",
            kind: PrimitiveKind::Data,
        };
        assert_eq!(err.to_string(), "Operation 'min' is not supported for data lists");
    }

    #[test]
    fn test_no_transaction_message() {
        let err = StrataError::NoActiveTransaction {
            operation: "modify a managed list",
        };
        assert!(err.is_no_transaction());
        assert!(err.to_string().contains("write transaction"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: StrataError = io_err.into();
        assert!(matches!(err, StrataError::Io(_)));
    }
}
