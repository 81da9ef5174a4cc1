//! Storage adapters behind a list handle
//!
//! A [`ListBacking`] is the value-level view of one list property. Two
//! implementations exist:
//! - [`UnmanagedBacking`]: the list lives in a detached in-memory record
//! - [`ManagedBacking`]: the list lives in a record owned by a [`Database`]
//!
//! Indices handed to a backing are already validated against its length by
//! the list layer. Both backings still reject an out-of-range index with an
//! `Internal` error instead of panicking. The managed backing re-checks liveness on every call so a
//! deleted record is reported as `Invalidated` before anything else.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use strata_core::{ObjectId, PrimitiveKind, StrataError, StrataResult, Value};
use strata_engine::Database;
use strata_storage::StoredRecord;

/// Value-level access to one list property
///
/// The default methods are written in terms of the required ones; backings
/// override them when they can do the work in a single step.
pub trait ListBacking: Send + Sync + fmt::Debug {
    /// Property the list is bound to
    fn property(&self) -> &str;

    /// Declared element kind
    fn kind(&self) -> PrimitiveKind;

    /// Whether the list is owned by a database
    fn is_managed(&self) -> bool;

    /// Whether the owning record still exists
    fn is_live(&self) -> bool;

    /// Current element count
    fn len(&self) -> StrataResult<usize>;

    /// Element at a validated index
    fn value_at(&self, index: usize) -> StrataResult<Value>;

    /// Overwrite the element at a validated index
    fn set_at(&self, index: usize, value: Value) -> StrataResult<()>;

    /// Insert at a validated index in `[0, len]`
    fn insert_at(&self, index: usize, value: Value) -> StrataResult<()>;

    /// Remove and return the element at a validated index
    fn remove_at(&self, index: usize) -> StrataResult<Value>;

    /// Snapshot of every element in order
    fn values(&self) -> StrataResult<Vec<Value>> {
        let len = self.len()?;
        (0..len).map(|i| self.value_at(i)).collect()
    }

    /// Append every value in order
    fn extend(&self, values: Vec<Value>) -> StrataResult<()> {
        for value in values {
            let len = self.len()?;
            self.insert_at(len, value)?;
        }
        Ok(())
    }

    /// Keep only the first `len` elements
    fn truncate(&self, len: usize) -> StrataResult<()> {
        while self.len()? > len {
            let last = self.len()? - 1;
            self.remove_at(last)?;
        }
        Ok(())
    }

    /// Remove every element
    fn clear(&self) -> StrataResult<()> {
        self.truncate(0)
    }

    /// Relocate the element at `from` so it ends up at `to`
    fn move_item(&self, from: usize, to: usize) -> StrataResult<()> {
        let value = self.remove_at(from)?;
        self.insert_at(to, value)
    }

    /// Exchange two elements
    fn swap(&self, a: usize, b: usize) -> StrataResult<()> {
        let first = self.value_at(a)?;
        let second = self.value_at(b)?;
        self.set_at(a, second)?;
        self.set_at(b, first)
    }
}

// ============================================================================
// Range-checked edits
// ============================================================================

fn unchecked(index: usize) -> StrataError {
    StrataError::internal(format!("unchecked index {}", index))
}

fn set_checked(xs: &mut [Value], index: usize, value: Value) -> StrataResult<()> {
    let slot = xs.get_mut(index).ok_or_else(|| unchecked(index))?;
    *slot = value;
    Ok(())
}

fn insert_checked(xs: &mut Vec<Value>, index: usize, value: Value) -> StrataResult<()> {
    if index > xs.len() {
        return Err(unchecked(index));
    }
    xs.insert(index, value);
    Ok(())
}

fn remove_checked(xs: &mut Vec<Value>, index: usize) -> StrataResult<Value> {
    if index >= xs.len() {
        return Err(unchecked(index));
    }
    Ok(xs.remove(index))
}

fn move_checked(xs: &mut Vec<Value>, from: usize, to: usize) -> StrataResult<()> {
    let bad = if from >= xs.len() { from } else { to };
    if from >= xs.len() || to >= xs.len() {
        return Err(unchecked(bad));
    }
    let value = xs.remove(from);
    xs.insert(to, value);
    Ok(())
}

fn swap_checked(xs: &mut [Value], a: usize, b: usize) -> StrataResult<()> {
    let bad = if a >= xs.len() { a } else { b };
    if a >= xs.len() || b >= xs.len() {
        return Err(unchecked(bad));
    }
    xs.swap(a, b);
    Ok(())
}

// ============================================================================
// Unmanaged
// ============================================================================

/// List stored in a detached record
pub struct UnmanagedBacking {
    record: Arc<RwLock<StoredRecord>>,
    property: String,
    kind: PrimitiveKind,
}

impl UnmanagedBacking {
    /// Bind to `property` of a detached record
    pub fn new(record: Arc<RwLock<StoredRecord>>, property: &str, kind: PrimitiveKind) -> Self {
        Self {
            record,
            property: property.to_string(),
            kind,
        }
    }

    fn read<R>(&self, f: impl FnOnce(&[Value]) -> R) -> StrataResult<R> {
        let record = self.record.read();
        record.list(&self.property).map(f)
    }

    fn write<R>(&self, f: impl FnOnce(&mut Vec<Value>) -> StrataResult<R>) -> StrataResult<R> {
        let mut record = self.record.write();
        record.list_mut(&self.property).and_then(f)
    }
}

impl fmt::Debug for UnmanagedBacking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnmanagedBacking")
            .field("property", &self.property)
            .field("kind", &self.kind)
            .finish()
    }
}

impl ListBacking for UnmanagedBacking {
    fn property(&self) -> &str {
        &self.property
    }

    fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    fn is_managed(&self) -> bool {
        false
    }

    fn is_live(&self) -> bool {
        true
    }

    fn len(&self) -> StrataResult<usize> {
        self.read(|xs| xs.len())
    }

    fn value_at(&self, index: usize) -> StrataResult<Value> {
        self.read(|xs| xs.get(index).cloned())?
            .ok_or_else(|| unchecked(index))
    }

    fn set_at(&self, index: usize, value: Value) -> StrataResult<()> {
        self.write(|xs| set_checked(xs, index, value))
    }

    fn insert_at(&self, index: usize, value: Value) -> StrataResult<()> {
        self.write(|xs| insert_checked(xs, index, value))
    }

    fn remove_at(&self, index: usize) -> StrataResult<Value> {
        self.write(|xs| remove_checked(xs, index))
    }

    fn values(&self) -> StrataResult<Vec<Value>> {
        self.read(<[Value]>::to_vec)
    }

    fn extend(&self, values: Vec<Value>) -> StrataResult<()> {
        self.write(|xs| {
            xs.extend(values);
            Ok(())
        })
    }

    fn truncate(&self, len: usize) -> StrataResult<()> {
        self.write(|xs| {
            xs.truncate(len);
            Ok(())
        })
    }

    fn move_item(&self, from: usize, to: usize) -> StrataResult<()> {
        self.write(|xs| move_checked(xs, from, to))
    }

    fn swap(&self, a: usize, b: usize) -> StrataResult<()> {
        self.write(|xs| swap_checked(xs, a, b))
    }
}

// ============================================================================
// Managed
// ============================================================================

/// List stored in a database record
pub struct ManagedBacking {
    db: Arc<Database>,
    id: ObjectId,
    incarnation: u64,
    property: String,
    kind: PrimitiveKind,
}

impl ManagedBacking {
    /// Bind to `property` of a managed record incarnation
    pub fn new(
        db: Arc<Database>,
        id: ObjectId,
        incarnation: u64,
        property: &str,
        kind: PrimitiveKind,
    ) -> Self {
        Self {
            db,
            id,
            incarnation,
            property: property.to_string(),
            kind,
        }
    }

    fn read<R>(&self, f: impl FnOnce(&[Value]) -> R) -> StrataResult<R> {
        self.db.read_list(self.id, self.incarnation, &self.property, f)
    }

    fn write<R>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut Vec<Value>) -> StrataResult<R>,
    ) -> StrataResult<R> {
        self.db
            .write_list(self.id, self.incarnation, &self.property, operation, f)
    }
}

impl fmt::Debug for ManagedBacking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedBacking")
            .field("id", &self.id)
            .field("incarnation", &self.incarnation)
            .field("property", &self.property)
            .field("kind", &self.kind)
            .finish()
    }
}

impl ListBacking for ManagedBacking {
    fn property(&self) -> &str {
        &self.property
    }

    fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    fn is_managed(&self) -> bool {
        true
    }

    fn is_live(&self) -> bool {
        self.db.is_live(self.id, self.incarnation)
    }

    fn len(&self) -> StrataResult<usize> {
        self.read(|xs| xs.len())
    }

    fn value_at(&self, index: usize) -> StrataResult<Value> {
        self.read(|xs| xs.get(index).cloned())?
            .ok_or_else(|| unchecked(index))
    }

    fn set_at(&self, index: usize, value: Value) -> StrataResult<()> {
        self.write("replace", |xs| set_checked(xs, index, value))
    }

    fn insert_at(&self, index: usize, value: Value) -> StrataResult<()> {
        let db = &self.db;
        let property = &self.property;
        self.write("insert", |xs| {
            db.check_list_capacity(property, xs.len() + 1)?;
            insert_checked(xs, index, value)
        })
    }

    fn remove_at(&self, index: usize) -> StrataResult<Value> {
        self.write("remove", |xs| remove_checked(xs, index))
    }

    fn values(&self) -> StrataResult<Vec<Value>> {
        self.read(<[Value]>::to_vec)
    }

    fn extend(&self, values: Vec<Value>) -> StrataResult<()> {
        let db = &self.db;
        let property = &self.property;
        self.write("append", |xs| {
            db.check_list_capacity(property, xs.len() + values.len())?;
            xs.extend(values);
            Ok(())
        })
    }

    fn truncate(&self, len: usize) -> StrataResult<()> {
        self.write("remove", |xs| {
            xs.truncate(len);
            Ok(())
        })
    }

    fn move_item(&self, from: usize, to: usize) -> StrataResult<()> {
        self.write("move", |xs| move_checked(xs, from, to))
    }

    fn swap(&self, a: usize, b: usize) -> StrataResult<()> {
        self.write("swap", |xs| swap_checked(xs, a, b))
    }
}
