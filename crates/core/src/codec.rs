//! Per-kind value codec
//!
//! Typed lists are generic over [`PrimitiveValue`]. Capability traits layer
//! on top of it so that unsupported aggregation is a compile error rather
//! than a runtime failure:
//!
//! - [`PrimitiveValue`]: conversion to/from [`Value`], kind tag, zero value
//! - [`OrderedValue`]: total order for `min`, `max` and `sorted`
//! - [`AddableValue`]: numeric widening for `sum` and `average`
//!
//! Widening rule: integer kinds accumulate in `i128`, float kinds in `f64`.

use crate::contract::{PrimitiveKind, Timestamp};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::Debug;

/// A Rust type that can be stored as a list element
pub trait PrimitiveValue: Clone + Debug + PartialEq + Send + Sync + 'static {
    /// The storage kind of this type
    const KIND: PrimitiveKind;

    /// Convert into the storage representation
    fn into_value(self) -> Value;

    /// Convert from the storage representation
    ///
    /// Returns `None` when the value has a different kind.
    fn from_value(value: Value) -> Option<Self>;

    /// Borrowing variant of [`PrimitiveValue::from_value`]
    fn from_value_ref(value: &Value) -> Option<Self>;

    /// The zero value of this kind
    fn zero() -> Self;
}

/// Element types with a total order
pub trait OrderedValue: PrimitiveValue {
    /// Compare two elements
    fn compare(&self, other: &Self) -> Ordering;
}

/// Element types that can be summed and averaged
pub trait AddableValue: OrderedValue {
    /// Widen into the common numeric representation
    fn widen(&self) -> Numeric;
}

/// Common numeric representation returned by `sum`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Numeric {
    /// Sum of an integer kind
    Integer(i128),
    /// Sum of a floating point kind
    Float(f64),
}

impl Numeric {
    /// The additive identity for elements of `kind`
    ///
    /// Integer kinds use `Integer(0)`, everything else `Float(0.0)`.
    pub fn zero_for(kind: PrimitiveKind) -> Self {
        if kind.is_integer() {
            Numeric::Integer(0)
        } else {
            Numeric::Float(0.0)
        }
    }

    /// Add another widened value
    ///
    /// Mixing an integer and a float sum produces a float.
    pub fn add(self, other: Numeric) -> Numeric {
        match (self, other) {
            (Numeric::Integer(a), Numeric::Integer(b)) => Numeric::Integer(a.saturating_add(b)),
            (a, b) => Numeric::Float(a.as_f64() + b.as_f64()),
        }
    }

    /// The value as f64
    pub fn as_f64(&self) -> f64 {
        match self {
            Numeric::Integer(i) => *i as f64,
            Numeric::Float(f) => *f,
        }
    }

    /// The value as i128, if it is an integer sum
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Numeric::Integer(i) => Some(*i),
            Numeric::Float(_) => None,
        }
    }

    /// Widen a storage value, if its kind is numeric
    pub fn from_value(value: &Value) -> Option<Numeric> {
        match value {
            Value::Float(f) => Some(Numeric::Float(f64::from(*f))),
            Value::Double(d) => Some(Numeric::Float(*d)),
            other => other.as_i128().map(Numeric::Integer),
        }
    }
}

/// Ordering for floats: NaN sorts after every number and equals itself
fn compare_floats(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Compare two storage values of the same orderable kind
///
/// Returns `None` for mismatched kinds or for `Data`.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Float(x), Value::Float(y)) => Some(compare_floats(f64::from(*x), f64::from(*y))),
        (Value::Double(x), Value::Double(y)) => Some(compare_floats(*x, *y)),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Date(x), Value::Date(y)) => Some(x.cmp(y)),
        (x, y) if x.kind() == y.kind() => match (x.as_i128(), y.as_i128()) {
            (Some(i), Some(j)) => Some(i.cmp(&j)),
            _ => None,
        },
        _ => None,
    }
}

macro_rules! impl_primitive_value {
    ($ty:ty, $kind:ident, $zero:expr) => {
        impl PrimitiveValue for $ty {
            const KIND: PrimitiveKind = PrimitiveKind::$kind;

            fn into_value(self) -> Value {
                Value::$kind(self)
            }

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$kind(v) => Some(v),
                    _ => None,
                }
            }

            fn from_value_ref(value: &Value) -> Option<Self> {
                match value {
                    Value::$kind(v) => Some(v.clone()),
                    _ => None,
                }
            }

            fn zero() -> Self {
                $zero
            }
        }
    };
}

macro_rules! impl_integer {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl_primitive_value!($ty, $kind, 0);

            impl OrderedValue for $ty {
                fn compare(&self, other: &Self) -> Ordering {
                    self.cmp(other)
                }
            }

            impl AddableValue for $ty {
                fn widen(&self) -> Numeric {
                    Numeric::Integer(*self as i128)
                }
            }
        )*
    };
}

macro_rules! impl_float {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl_primitive_value!($ty, $kind, 0.0);

            impl OrderedValue for $ty {
                fn compare(&self, other: &Self) -> Ordering {
                    compare_floats(f64::from(*self), f64::from(*other))
                }
            }

            impl AddableValue for $ty {
                fn widen(&self) -> Numeric {
                    Numeric::Float(f64::from(*self))
                }
            }
        )*
    };
}

impl_integer!(isize => Int, i8 => Int8, i16 => Int16, i32 => Int32, i64 => Int64);
impl_float!(f32 => Float, f64 => Double);

impl_primitive_value!(String, String, String::new());
impl_primitive_value!(Vec<u8>, Data, Vec::new());
impl_primitive_value!(Timestamp, Date, Timestamp::EPOCH);

impl OrderedValue for String {
    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl OrderedValue for Timestamp {
    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}
