//! DynamicList: a list whose element kind is known only at runtime
//!
//! Every operation validates in the same order:
//! 1. the owning record is live (`Invalidated`)
//! 2. argument kinds match the declared kind (`TypeMismatch`)
//! 3. indices are in range (`NegativeIndex`, `IndexOutOfBounds`)
//!
//! Only then does the backing change. [`PrimitiveList`](crate::PrimitiveList)
//! wraps a DynamicList and adds compile-time kind checks.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use strata_core::{
    check_element_index, check_insert_index, compare_values, ListIndex, Numeric, PrimitiveKind,
    StrataError, StrataResult, Value,
};
use tracing::trace;

use crate::backing::ListBacking;

/// Handle to a list property with a runtime element kind
///
/// Cloning a handle is cheap; clones observe the same list.
#[derive(Clone)]
pub struct DynamicList {
    backing: Arc<dyn ListBacking>,
}

impl fmt::Debug for DynamicList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicList")
            .field("backing", &self.backing)
            .finish()
    }
}

impl DynamicList {
    pub(crate) fn from_backing(backing: Arc<dyn ListBacking>) -> Self {
        Self { backing }
    }

    /// Declared element kind
    pub fn kind(&self) -> PrimitiveKind {
        self.backing.kind()
    }

    /// Property the list is bound to
    pub fn property(&self) -> &str {
        self.backing.property()
    }

    /// Whether the list is owned by a database
    pub fn is_managed(&self) -> bool {
        self.backing.is_managed()
    }

    /// Whether the owning record was deleted
    ///
    /// Never fails. Unmanaged lists are never invalidated.
    pub fn is_invalidated(&self) -> bool {
        !self.backing.is_live()
    }

    fn ensure_live(&self) -> StrataResult<()> {
        if self.backing.is_live() {
            Ok(())
        } else {
            trace!(
                target: "strata::db",
                property = self.property(),
                kind = %self.kind(),
                "Access to invalidated list"
            );
            Err(StrataError::invalidated(self.property()))
        }
    }

    fn check_kind(&self, value: &Value) -> StrataResult<()> {
        if value.kind() == self.kind() {
            Ok(())
        } else {
            Err(StrataError::TypeMismatch {
                property: self.property().to_string(),
                expected: self.kind(),
                actual: value.kind(),
            })
        }
    }

    fn require_orderable(&self, operation: &'static str) -> StrataResult<()> {
        if self.kind().is_orderable() {
            Ok(())
        } else {
            Err(StrataError::UnsupportedOperation {
                operation,
                kind: self.kind(),
            })
        }
    }

    fn require_numeric(&self, operation: &'static str) -> StrataResult<()> {
        if self.kind().is_numeric() {
            Ok(())
        } else {
            Err(StrataError::UnsupportedOperation {
                operation,
                kind: self.kind(),
            })
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Number of elements
    pub fn len(&self) -> StrataResult<usize> {
        self.ensure_live()?;
        self.backing.len()
    }

    /// Whether the list has no elements
    pub fn is_empty(&self) -> StrataResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Element at `index`
    pub fn get<I: ListIndex>(&self, index: I) -> StrataResult<Value> {
        let index = check_element_index(index, self.len()?)?;
        self.backing.value_at(index)
    }

    /// First element, if any
    pub fn first(&self) -> StrataResult<Option<Value>> {
        match self.len()? {
            0 => Ok(None),
            _ => self.backing.value_at(0).map(Some),
        }
    }

    /// Last element, if any
    pub fn last(&self) -> StrataResult<Option<Value>> {
        match self.len()? {
            0 => Ok(None),
            len => self.backing.value_at(len - 1).map(Some),
        }
    }

    /// Snapshot of every element in order
    pub fn values(&self) -> StrataResult<Vec<Value>> {
        self.ensure_live()?;
        self.backing.values()
    }

    /// Lowest index holding a value equal to `value`
    ///
    /// Float elements compare with IEEE equality, so NaN is never found.
    pub fn index_of(&self, value: &Value) -> StrataResult<Option<usize>> {
        self.ensure_live()?;
        self.check_kind(value)?;
        Ok(self.backing.values()?.iter().position(|v| v == value))
    }

    /// Whether any element equals `value`
    pub fn contains(&self, value: &Value) -> StrataResult<bool> {
        Ok(self.index_of(value)?.is_some())
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Append one value
    pub fn append(&self, value: Value) -> StrataResult<()> {
        self.ensure_live()?;
        self.check_kind(&value)?;
        self.backing.extend(vec![value])
    }

    /// Append values in order
    ///
    /// Nothing is appended if any value has the wrong kind.
    pub fn append_all<I>(&self, values: I) -> StrataResult<()>
    where
        I: IntoIterator<Item = Value>,
    {
        self.ensure_live()?;
        let values: Vec<Value> = values.into_iter().collect();
        for value in &values {
            self.check_kind(value)?;
        }
        self.backing.extend(values)
    }

    /// Insert `value` at `index`, shifting later elements right
    ///
    /// `index` may equal the length, which appends.
    pub fn insert<I: ListIndex>(&self, value: Value, index: I) -> StrataResult<()> {
        self.ensure_live()?;
        self.check_kind(&value)?;
        let index = check_insert_index(index, self.backing.len()?)?;
        self.backing.insert_at(index, value)
    }

    /// Remove and return the element at `index`, shifting later elements left
    pub fn remove<I: ListIndex>(&self, index: I) -> StrataResult<Value> {
        let index = check_element_index(index, self.len()?)?;
        self.backing.remove_at(index)
    }

    /// Remove the last element; a no-op on an empty list
    pub fn remove_last(&self) -> StrataResult<()> {
        self.remove_last_n(1)
    }

    /// Remove up to `n` elements from the tail
    pub fn remove_last_n(&self, n: usize) -> StrataResult<()> {
        let len = self.len()?;
        self.backing.truncate(len.saturating_sub(n))
    }

    /// Remove every element
    pub fn remove_all(&self) -> StrataResult<()> {
        self.ensure_live()?;
        self.backing.clear()
    }

    /// Overwrite the element at `index`
    pub fn replace<I: ListIndex>(&self, index: I, value: Value) -> StrataResult<()> {
        self.ensure_live()?;
        self.check_kind(&value)?;
        let index = check_element_index(index, self.backing.len()?)?;
        self.backing.set_at(index, value)
    }

    /// Move the element at `from` so it ends up at `to`
    pub fn move_item<I: ListIndex, J: ListIndex>(&self, from: I, to: J) -> StrataResult<()> {
        let len = self.len()?;
        let from = check_element_index(from, len)?;
        let to = check_element_index(to, len)?;
        self.backing.move_item(from, to)
    }

    /// Exchange the elements at `a` and `b`
    pub fn swap<I: ListIndex, J: ListIndex>(&self, a: I, b: J) -> StrataResult<()> {
        let len = self.len()?;
        let a = check_element_index(a, len)?;
        let b = check_element_index(b, len)?;
        self.backing.swap(a, b)
    }

    // ========================================================================
    // Aggregates
    // ========================================================================

    /// Elements in sorted order; the list itself is unchanged
    pub fn sorted(&self, ascending: bool) -> StrataResult<Vec<Value>> {
        self.ensure_live()?;
        self.require_orderable("sorted")?;
        let mut values = self.backing.values()?;
        if ascending {
            values.sort_by(by_value);
        } else {
            values.sort_by(|a, b| by_value(b, a));
        }
        Ok(values)
    }

    /// Smallest element, `None` when empty
    pub fn min(&self) -> StrataResult<Option<Value>> {
        self.ensure_live()?;
        self.require_orderable("min")?;
        Ok(self.backing.values()?.into_iter().min_by(by_value))
    }

    /// Largest element, `None` when empty
    pub fn max(&self) -> StrataResult<Option<Value>> {
        self.ensure_live()?;
        self.require_orderable("max")?;
        Ok(self.backing.values()?.into_iter().max_by(by_value))
    }

    /// Sum of all elements; the kind's zero when empty
    pub fn sum(&self) -> StrataResult<Numeric> {
        self.ensure_live()?;
        self.require_numeric("sum")?;
        Ok(self
            .backing
            .values()?
            .iter()
            .filter_map(Numeric::from_value)
            .fold(Numeric::zero_for(self.kind()), Numeric::add))
    }

    /// Arithmetic mean, `None` when empty
    pub fn average(&self) -> StrataResult<Option<f64>> {
        self.ensure_live()?;
        self.require_numeric("average")?;
        let values = self.backing.values()?;
        if values.is_empty() {
            return Ok(None);
        }
        let total = values
            .iter()
            .filter_map(Numeric::from_value)
            .fold(Numeric::zero_for(self.kind()), Numeric::add);
        Ok(Some(total.as_f64() / values.len() as f64))
    }
}

/// Elements of one list always share a kind, so a missing ordering is unreachable
fn by_value(a: &Value, b: &Value) -> Ordering {
    compare_values(a, b).unwrap_or(Ordering::Equal)
}
