//! Strata lists - persistent ordered lists of primitive values
//!
//! A list holds elements of one of ten primitive kinds (`Int`, `Int8`,
//! `Int16`, `Int32`, `Int64`, `Float`, `Double`, `String`, `Data`, `Date`).
//! Lists live as properties of objects. An object is unmanaged until it is
//! added to a [`Database`], after which its lists change only inside a write
//! transaction and become invalidated when the object is deleted.
//!
//! # Quick Start
//!
//! ```
//! use strata_lists::{Database, Object, ObjectSchema, ObjectStoreExt, PrimitiveKind};
//!
//! let schema = ObjectSchema::builder("Reading")
//!     .list("samples", PrimitiveKind::Double)
//!     .build()?;
//! let db = Database::open_in_memory();
//!
//! let reading = db.write(|| db.add(Object::new(schema)))?;
//! let samples = reading.list::<f64>("samples")?;
//! db.write(|| samples.append_all([1.5, 2.5, 4.0]))?;
//!
//! assert_eq!(samples.max()?, Some(4.0));
//! assert_eq!(samples.average()?, Some(8.0 / 3.0));
//! # Ok::<(), strata_lists::StrataError>(())
//! ```
//!
//! # Architecture
//!
//! - `strata-core`: kinds, values, schemas, index validation, errors
//! - `strata-storage`: in-memory record store
//! - `strata-concurrency`: the write transaction and its overlay
//! - `strata-engine`: [`Database`], configuration, write scopes
//! - `strata-primitives`: [`Object`], [`PrimitiveList`], [`DynamicList`]

pub use strata_core::{
    AddableValue, ListIndex, Numeric, ObjectId, ObjectSchema, OrderedValue, PrimitiveKind,
    PrimitiveValue, StrataError, StrataResult, Timestamp, Value,
};
pub use strata_engine::{Database, DatabaseConfig, TransactionStats, WriteScope, CONFIG_FILE_NAME};
pub use strata_primitives::{DynamicList, ListBacking, Object, ObjectStoreExt, PrimitiveList};
