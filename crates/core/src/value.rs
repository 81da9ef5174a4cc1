//! Storage value type for list elements
//!
//! `Value` is the type-tagged representation the storage layer holds. Typed
//! lists convert to and from it through the codec traits in [`crate::codec`].
//!
//! ### Type Rules
//!
//! - Exactly one variant per [`PrimitiveKind`]
//! - No implicit coercion: `Int32(1) != Int64(1)`
//! - `Data` is not `String`
//! - Floats use IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`

use crate::contract::{PrimitiveKind, Timestamp};
use serde::{Deserialize, Serialize};

/// A single list element as held by storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Platform-width signed integer
    Int(isize),
    /// 8-bit signed integer
    Int8(i8),
    /// 16-bit signed integer
    Int16(i16),
    /// 32-bit signed integer
    Int32(i32),
    /// 64-bit signed integer
    Int64(i64),
    /// Single precision float
    Float(f32),
    /// Double precision float
    Double(f64),
    /// UTF-8 text
    String(String),
    /// Opaque bytes
    Data(Vec<u8>),
    /// Absolute timestamp
    Date(Timestamp),
}

impl Value {
    /// The primitive kind of this value
    pub const fn kind(&self) -> PrimitiveKind {
        match self {
            Value::Int(_) => PrimitiveKind::Int,
            Value::Int8(_) => PrimitiveKind::Int8,
            Value::Int16(_) => PrimitiveKind::Int16,
            Value::Int32(_) => PrimitiveKind::Int32,
            Value::Int64(_) => PrimitiveKind::Int64,
            Value::Float(_) => PrimitiveKind::Float,
            Value::Double(_) => PrimitiveKind::Double,
            Value::String(_) => PrimitiveKind::String,
            Value::Data(_) => PrimitiveKind::Data,
            Value::Date(_) => PrimitiveKind::Date,
        }
    }

    /// Get the type name as a string
    pub const fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    /// Integer payload widened to i128, for integer kinds
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Value::Int(v) => Some(*v as i128),
            Value::Int8(v) => Some(i128::from(*v)),
            Value::Int16(v) => Some(i128::from(*v)),
            Value::Int32(v) => Some(i128::from(*v)),
            Value::Int64(v) => Some(i128::from(*v)),
            _ => None,
        }
    }

    /// Numeric payload as f64, for numeric kinds
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(f64::from(*v)),
            Value::Double(v) => Some(*v),
            other => other.as_i128().map(|i| i as f64),
        }
    }

    /// Text payload
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Byte payload
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Data(b) => Some(b),
            _ => None,
        }
    }

    /// Timestamp payload
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Date(ts) => Some(*ts),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Int8(v) => write!(f, "{}", v),
            Value::Int16(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Data(b) => write!(f, "<{} bytes>", b.len()),
            Value::Date(ts) => write!(f, "{}", ts),
        }
    }
}
