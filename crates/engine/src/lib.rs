//! Database engine for Strata lists
//!
//! This crate orchestrates the lower layers:
//! - Database: record storage plus the single write transaction
//! - DatabaseConfig: TOML configuration
//! - WriteScope: RAII guard over a write transaction
//!
//! The engine is the only component that decides whether a list access is
//! allowed: it checks record liveness, the transaction rule and the
//! configured list length limit before any list data changes.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod database;

pub use database::{Database, DatabaseConfig, WriteScope, CONFIG_FILE_NAME};
pub use strata_concurrency::TransactionStats;
