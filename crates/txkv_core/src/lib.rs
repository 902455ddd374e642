//! # txkv Core
//!
//! Transactional in-memory key/value engine.
//!
//! This crate provides:
//! - A committed table: open addressing with linear probing and djb2 hashing
//! - A transaction buffer that logs writes in order until commit
//! - A transaction manager that merges a buffer into the table, growing and
//!   rehashing when the post-merge load would pass the configured bound
//! - The [`Database`] facade and a mutex-guarded [`SharedDatabase`]
//!
//! Only one transaction can be open at a time. Reads always see committed
//! state; buffered writes become visible on commit and vanish on rollback.
//!
//! ## Example
//!
//! ```rust
//! use txkv_core::{CoreError, Database};
//!
//! let mut db: Database = Database::new();
//! db.begin().unwrap();
//! db.put("B", 10).unwrap();
//! db.rollback().unwrap();
//! assert!(db.get("B").is_none());
//! assert_eq!(db.rollback(), Err(CoreError::NoActiveTransaction));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod database;
mod error;
pub mod hash;
mod stats;
mod sync;
mod table;
pub mod transaction;
mod types;

pub use config::Config;
pub use database::Database;
pub use error::{CoreError, CoreResult};
pub use stats::{DatabaseStats, StatsSnapshot};
pub use sync::SharedDatabase;
pub use table::CommittedTable;
pub use transaction::{TransactionManager, TransactionState};
pub use types::{CommitSummary, InsertOutcome, TransactionId};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
