//! Primitives layer for Strata lists
//!
//! Provides ordered lists of primitive values over the Database engine:
//! - **PrimitiveList<T>**: typed list of one of the ten primitive kinds
//! - **DynamicList**: the same operations with the kind known at runtime
//! - **Object**: a record owning list properties, unmanaged or managed
//! - **ObjectStoreExt**: add, delete and fetch objects through a database
//!
//! ## Lifecycle
//!
//! Unmanaged lists live in memory and never need a transaction. Managed
//! lists live in a database record: they change only inside a write
//! transaction and are invalidated permanently once the record is deleted.
//!
//! ```
//! use strata_core::{ObjectSchema, PrimitiveKind};
//! use strata_engine::Database;
//! use strata_primitives::{Object, ObjectStoreExt};
//!
//! let schema = ObjectSchema::builder("Sample")
//!     .list("values", PrimitiveKind::Int32)
//!     .build()
//!     .unwrap();
//! let db = Database::open_in_memory();
//! let sample = db.write(|| db.add(Object::new(schema))).unwrap();
//! let values = sample.list::<i32>("values").unwrap();
//!
//! assert!(values.append(1).is_err(), "managed lists need a transaction");
//! db.write(|| values.append_all([4, 8, 6])).unwrap();
//! assert_eq!(values.average().unwrap(), Some(6.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backing;
pub mod dynamic;
pub mod extensions;
pub mod list;
pub mod object;

pub use backing::{ListBacking, ManagedBacking, UnmanagedBacking};
pub use dynamic::DynamicList;
pub use extensions::ObjectStoreExt;
pub use list::PrimitiveList;
pub use object::Object;
