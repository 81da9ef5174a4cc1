//! PrimitiveList: typed ordered list of one primitive kind
//!
//! ## Design
//!
//! PrimitiveList<T> is a typed view over a [`DynamicList`]. The element type
//! fixes the kind at compile time, and aggregates are only available where
//! the kind supports them:
//!
//! | Operation | Bound |
//! |-----------|-------|
//! | `sorted`, `min`, `max` | `T: OrderedValue` |
//! | `sum`, `average` | `T: AddableValue` |
//!
//! A handle is either unmanaged (backed by an in-memory record) or managed
//! (backed by a database record). Both behave identically except that
//! managed lists require a write transaction to change and become
//! invalidated when their record is deleted.
//!
//! ## Example
//!
//! ```
//! use strata_primitives::PrimitiveList;
//!
//! let xs: PrimitiveList<i32> = PrimitiveList::new();
//! xs.append_all([3, 1, 2]).unwrap();
//! xs.insert(0, 0usize).unwrap();
//! assert_eq!(xs.to_vec().unwrap(), vec![0, 3, 1, 2]);
//! assert_eq!(xs.sorted(true).unwrap(), vec![0, 1, 2, 3]);
//! assert_eq!(xs.max().unwrap(), Some(3));
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::RwLock;
use strata_core::{
    AddableValue, ListIndex, Numeric, ObjectSchema, OrderedValue, PrimitiveValue, StrataError,
    StrataResult, Value,
};
use strata_storage::StoredRecord;

use crate::backing::{ListBacking, UnmanagedBacking};
use crate::dynamic::DynamicList;

/// Property name of the anonymous record behind a standalone list
const STANDALONE_PROPERTY: &str = "values";

/// Handle to a list of `T`
pub struct PrimitiveList<T: PrimitiveValue> {
    inner: DynamicList,
    _marker: PhantomData<fn() -> T>,
}

impl<T: PrimitiveValue> Clone for PrimitiveList<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: PrimitiveValue> fmt::Debug for PrimitiveList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimitiveList")
            .field("kind", &T::KIND)
            .field("inner", &self.inner)
            .finish()
    }
}

impl<T: PrimitiveValue> Default for PrimitiveList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PrimitiveValue> PrimitiveList<T> {
    /// Create an empty standalone unmanaged list
    pub fn new() -> Self {
        let schema = ObjectSchema::single_list(STANDALONE_PROPERTY, T::KIND);
        let record = Arc::new(RwLock::new(StoredRecord::new(schema)));
        Self::from_backing(Arc::new(UnmanagedBacking::new(
            record,
            STANDALONE_PROPERTY,
            T::KIND,
        )))
    }

    pub(crate) fn from_backing(backing: Arc<dyn ListBacking>) -> Self {
        debug_assert_eq!(backing.kind(), T::KIND);
        Self {
            inner: DynamicList::from_backing(backing),
            _marker: PhantomData,
        }
    }

    fn decode(&self, value: Value) -> StrataResult<T> {
        let actual = value.kind();
        T::from_value(value).ok_or_else(|| StrataError::TypeMismatch {
            property: self.inner.property().to_string(),
            expected: T::KIND,
            actual,
        })
    }

    fn decode_all(&self, values: Vec<Value>) -> StrataResult<Vec<T>> {
        values.into_iter().map(|v| self.decode(v)).collect()
    }

    /// Untyped view of the same list
    pub fn as_dynamic(&self) -> &DynamicList {
        &self.inner
    }

    /// Property the list is bound to
    pub fn property(&self) -> &str {
        self.inner.property()
    }

    /// Whether the list is owned by a database
    pub fn is_managed(&self) -> bool {
        self.inner.is_managed()
    }

    /// Whether the owning record was deleted. Never fails.
    pub fn is_invalidated(&self) -> bool {
        self.inner.is_invalidated()
    }

    /// Number of elements
    pub fn len(&self) -> StrataResult<usize> {
        self.inner.len()
    }

    /// Whether the list has no elements
    pub fn is_empty(&self) -> StrataResult<bool> {
        self.inner.is_empty()
    }

    /// Element at `index`
    ///
    /// # Errors
    /// `NegativeIndex` or `IndexOutOfBounds` outside `[0, len)`.
    pub fn get<I: ListIndex>(&self, index: I) -> StrataResult<T> {
        let value = self.inner.get(index)?;
        self.decode(value)
    }

    /// First element, if any
    pub fn first(&self) -> StrataResult<Option<T>> {
        self.inner.first()?.map(|v| self.decode(v)).transpose()
    }

    /// Last element, if any
    pub fn last(&self) -> StrataResult<Option<T>> {
        self.inner.last()?.map(|v| self.decode(v)).transpose()
    }

    /// Snapshot of every element in order
    pub fn to_vec(&self) -> StrataResult<Vec<T>> {
        let values = self.inner.values()?;
        self.decode_all(values)
    }

    /// Lowest index of an element equal to `value`
    pub fn index_of(&self, value: &T) -> StrataResult<Option<usize>> {
        self.inner.index_of(&value.clone().into_value())
    }

    /// Whether any element equals `value`
    pub fn contains(&self, value: &T) -> StrataResult<bool> {
        Ok(self.index_of(value)?.is_some())
    }

    /// Append one element
    pub fn append(&self, value: T) -> StrataResult<()> {
        self.inner.append(value.into_value())
    }

    /// Append elements in order
    pub fn append_all<I>(&self, values: I) -> StrataResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        self.inner
            .append_all(values.into_iter().map(T::into_value))
    }

    /// Insert at `index` in `[0, len]`, shifting later elements right
    pub fn insert<I: ListIndex>(&self, value: T, index: I) -> StrataResult<()> {
        self.inner.insert(value.into_value(), index)
    }

    /// Remove and return the element at `index`
    pub fn remove<I: ListIndex>(&self, index: I) -> StrataResult<T> {
        let value = self.inner.remove(index)?;
        self.decode(value)
    }

    /// Remove the last element; a no-op on an empty list
    pub fn remove_last(&self) -> StrataResult<()> {
        self.inner.remove_last()
    }

    /// Remove up to `n` elements from the tail
    pub fn remove_last_n(&self, n: usize) -> StrataResult<()> {
        self.inner.remove_last_n(n)
    }

    /// Remove every element
    pub fn remove_all(&self) -> StrataResult<()> {
        self.inner.remove_all()
    }

    /// Overwrite the element at `index`
    pub fn replace<I: ListIndex>(&self, index: I, value: T) -> StrataResult<()> {
        self.inner.replace(index, value.into_value())
    }

    /// Move the element at `from` so it ends up at `to`
    pub fn move_item<I: ListIndex, J: ListIndex>(&self, from: I, to: J) -> StrataResult<()> {
        self.inner.move_item(from, to)
    }

    /// Exchange the elements at `a` and `b`
    pub fn swap<I: ListIndex, J: ListIndex>(&self, a: I, b: J) -> StrataResult<()> {
        self.inner.swap(a, b)
    }
}

impl<T: OrderedValue> PrimitiveList<T> {
    /// Elements in sorted order; the list itself is unchanged
    pub fn sorted(&self, ascending: bool) -> StrataResult<Vec<T>> {
        let mut items = self.to_vec()?;
        if ascending {
            items.sort_by(|a, b| a.compare(b));
        } else {
            items.sort_by(|a, b| b.compare(a));
        }
        Ok(items)
    }

    /// Smallest element, `None` when empty
    pub fn min(&self) -> StrataResult<Option<T>> {
        Ok(self.to_vec()?.into_iter().min_by(|a, b| a.compare(b)))
    }

    /// Largest element, `None` when empty
    pub fn max(&self) -> StrataResult<Option<T>> {
        Ok(self.to_vec()?.into_iter().max_by(|a, b| a.compare(b)))
    }
}

impl<T: AddableValue> PrimitiveList<T> {
    /// Sum of all elements; the kind's zero when empty
    pub fn sum(&self) -> StrataResult<Numeric> {
        Ok(self
            .to_vec()?
            .iter()
            .map(T::widen)
            .fold(Numeric::zero_for(T::KIND), Numeric::add))
    }

    /// Arithmetic mean, `None` when empty
    pub fn average(&self) -> StrataResult<Option<f64>> {
        let items = self.to_vec()?;
        if items.is_empty() {
            return Ok(None);
        }
        let total = items
            .iter()
            .map(T::widen)
            .fold(Numeric::zero_for(T::KIND), Numeric::add);
        Ok(Some(total.as_f64() / items.len() as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::Timestamp;

    #[test]
    fn test_standalone_list_is_unmanaged() {
        let xs: PrimitiveList<String> = PrimitiveList::new();
        assert!(!xs.is_managed());
        assert!(!xs.is_invalidated());
        assert!(xs.is_empty().unwrap());
    }

    #[test]
    fn test_clones_share_contents() {
        let xs: PrimitiveList<i64> = PrimitiveList::new();
        let alias = xs.clone();
        alias.append(7).unwrap();
        assert_eq!(xs.to_vec().unwrap(), vec![7]);
    }

    #[test]
    fn test_out_of_bounds_message() {
        let xs: PrimitiveList<i8> = PrimitiveList::new();
        xs.append_all([1, 2, 3]).unwrap();
        assert_eq!(
            xs.get(3usize).unwrap_err().to_string(),
            "Index 3 is out of bounds (must be less than 3)"
        );
        assert_eq!(
            xs.get(-1i32).unwrap_err().to_string(),
            "Cannot pass a negative value -1 as an index"
        );
        assert_eq!(
            xs.insert(0, 4usize).unwrap_err().to_string(),
            "Index 4 is out of bounds (must be less than 4)"
        );
    }

    #[test]
    fn test_remove_returns_element() {
        let ys: PrimitiveList<Vec<u8>> = PrimitiveList::new();
        ys.append_all([vec![1], vec![2, 2]]).unwrap();
        assert_eq!(ys.remove(0usize).unwrap(), vec![1]);
        assert_eq!(ys.to_vec().unwrap(), vec![vec![2, 2]]);
    }

    #[test]
    fn test_integer_sum_does_not_overflow_kind() {
        let xs: PrimitiveList<i8> = PrimitiveList::new();
        xs.append_all([i8::MAX, i8::MAX, i8::MAX]).unwrap();
        assert_eq!(xs.sum().unwrap(), Numeric::Integer(381));
        assert_eq!(xs.average().unwrap(), Some(127.0));
    }

    #[test]
    fn test_float_nan_sorts_last_and_is_never_found() {
        let xs: PrimitiveList<f32> = PrimitiveList::new();
        xs.append_all([2.0, f32::NAN, -1.0]).unwrap();
        let sorted = xs.sorted(true).unwrap();
        assert_eq!(&sorted[..2], &[-1.0f32, 2.0]);
        assert!(sorted[2].is_nan());
        assert_eq!(xs.min().unwrap(), Some(-1.0));
        assert_eq!(xs.index_of(&f32::NAN).unwrap(), None);
    }

    #[test]
    fn test_dates_order_chronologically() {
        let xs: PrimitiveList<Timestamp> = PrimitiveList::new();
        let later = Timestamp::from_secs(1_700_000_000);
        xs.append_all([later, Timestamp::EPOCH]).unwrap();
        assert_eq!(xs.min().unwrap(), Some(Timestamp::EPOCH));
        assert_eq!(xs.sorted(false).unwrap(), vec![later, Timestamp::EPOCH]);
    }
}
