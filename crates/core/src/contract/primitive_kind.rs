//! Primitive kind enumeration
//!
//! Every list property stores elements of exactly one primitive kind.
//! The kind decides which operations the list supports:
//!
//! | Kind | Orderable | Numeric | Zero value |
//! |------|-----------|---------|------------|
//! | Int, Int8, Int16, Int32, Int64 | yes | yes | `0` |
//! | Float, Double | yes | yes | `0.0` |
//! | String | yes | no | `""` |
//! | Data | no | no | empty bytes |
//! | Date | yes | no | epoch |

use crate::contract::Timestamp;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// The ten primitive element kinds
///
/// ## Invariant
///
/// This enum MUST stay in sync with the variants of [`Value`].
/// Adding a kind requires a matching `Value` variant and codec impl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrimitiveKind {
    /// Platform-width signed integer
    Int,
    /// 8-bit signed integer
    Int8,
    /// 16-bit signed integer
    Int16,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// Single precision float
    Float,
    /// Double precision float
    Double,
    /// UTF-8 text
    String,
    /// Opaque byte sequence
    Data,
    /// Absolute timestamp
    Date,
}

impl PrimitiveKind {
    /// All primitive kinds (for iteration)
    pub const ALL: [PrimitiveKind; 10] = [
        PrimitiveKind::Int,
        PrimitiveKind::Int8,
        PrimitiveKind::Int16,
        PrimitiveKind::Int32,
        PrimitiveKind::Int64,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
        PrimitiveKind::String,
        PrimitiveKind::Data,
        PrimitiveKind::Date,
    ];

    /// Human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Int => "int",
            PrimitiveKind::Int8 => "int8",
            PrimitiveKind::Int16 => "int16",
            PrimitiveKind::Int32 => "int32",
            PrimitiveKind::Int64 => "int64",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::String => "string",
            PrimitiveKind::Data => "data",
            PrimitiveKind::Date => "date",
        }
    }

    /// Parse from [`PrimitiveKind::name`]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Whether elements of this kind have a total order (min, max, sorted)
    pub const fn is_orderable(&self) -> bool {
        !matches!(self, PrimitiveKind::Data)
    }

    /// Whether elements of this kind can be summed and averaged
    pub const fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_floating()
    }

    /// Whether this is one of the integer kinds
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            PrimitiveKind::Int
                | PrimitiveKind::Int8
                | PrimitiveKind::Int16
                | PrimitiveKind::Int32
                | PrimitiveKind::Int64
        )
    }

    /// Whether this is one of the floating point kinds
    pub const fn is_floating(&self) -> bool {
        matches!(self, PrimitiveKind::Float | PrimitiveKind::Double)
    }

    /// The zero value of this kind
    pub fn zero_value(&self) -> Value {
        match self {
            PrimitiveKind::Int => Value::Int(0),
            PrimitiveKind::Int8 => Value::Int8(0),
            PrimitiveKind::Int16 => Value::Int16(0),
            PrimitiveKind::Int32 => Value::Int32(0),
            PrimitiveKind::Int64 => Value::Int64(0),
            PrimitiveKind::Float => Value::Float(0.0),
            PrimitiveKind::Double => Value::Double(0.0),
            PrimitiveKind::String => Value::String(String::new()),
            PrimitiveKind::Data => Value::Data(Vec::new()),
            PrimitiveKind::Date => Value::Date(Timestamp::EPOCH),
        }
    }
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrip() {
        for kind in PrimitiveKind::ALL {
            assert_eq!(PrimitiveKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(PrimitiveKind::from_name("bool"), None);
    }

    #[test]
    fn test_only_data_is_unordered() {
        let unordered: Vec<_> = PrimitiveKind::ALL
            .iter()
            .filter(|k| !k.is_orderable())
            .collect();
        assert_eq!(unordered, vec![&PrimitiveKind::Data]);
    }

    #[test]
    fn test_numeric_kinds() {
        let numeric = PrimitiveKind::ALL.iter().filter(|k| k.is_numeric()).count();
        assert_eq!(numeric, 7);
        assert!(!PrimitiveKind::String.is_numeric());
        assert!(!PrimitiveKind::Date.is_numeric());
    }

    #[test]
    fn test_zero_value_matches_kind() {
        for kind in PrimitiveKind::ALL {
            assert_eq!(kind.zero_value().kind(), kind);
        }
    }
}
