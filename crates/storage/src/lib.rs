//! Storage layer for Strata lists
//!
//! This crate implements the committed side of the database:
//! - StoredRecord: per-record list contents aligned with the record schema
//! - RecordStore: BTreeMap-based storage with RwLock and a commit version
//!
//! Uncommitted changes never touch this crate directly; the concurrency
//! layer buffers them and applies them as one batch on commit.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod record;
pub mod store;

pub use record::StoredRecord;
pub use store::{RecordStore, RecordWrite};
