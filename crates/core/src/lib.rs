//! Core types and traits for Strata lists
//!
//! This crate defines the foundational types used throughout the system:
//! - PrimitiveKind: The ten element kinds a list may hold
//! - Value: Type-tagged storage representation of one element
//! - Codec traits: PrimitiveValue, OrderedValue, AddableValue, Numeric
//! - Timestamp: Absolute timestamps for `Date` lists
//! - ObjectId / ObjectSchema: Record identity and list property declarations
//! - ListIndex: Signed index arguments and bounds validation
//! - StrataError: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod contract;
pub mod error;
pub mod index;
pub mod types;
pub mod value;

pub use codec::{compare_values, AddableValue, Numeric, OrderedValue, PrimitiveValue};
pub use contract::{PrimitiveKind, Timestamp};
pub use error::{StrataError, StrataResult};
pub use index::{check_element_index, check_insert_index, ListIndex};
pub use types::{ObjectId, ObjectSchema, ObjectSchemaBuilder, PropertySchema};
pub use value::Value;
