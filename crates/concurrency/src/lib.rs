//! Concurrency layer for Strata lists
//!
//! This crate implements the single-writer transaction model:
//! - TransactionContext: copy-on-write overlay with read-your-writes
//! - TransactionManager: one open write transaction per database
//!
//! Readers outside the transaction see committed state only. Commit applies
//! the overlay to the store in one batch; abort discards it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod manager;
pub mod transaction;

pub use manager::{TransactionManager, TransactionStats};
pub use transaction::{PendingOperations, TransactionContext, TransactionStatus};
