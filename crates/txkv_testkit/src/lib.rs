//! # txkv Testkit
//!
//! Test utilities for txkv.
//!
//! This crate provides:
//! - Key sets and pre-populated database fixtures
//! - Property-based operation generators using proptest
//! - A model harness that checks a database against a `HashMap` reference
//! - Sequential stress helpers
//!
//! ## Usage
//!
//! ```rust
//! use txkv_testkit::prelude::*;
//!
//! let keys = KeySet::new("user", 100);
//! let db = populated_database(&keys, 10);
//! assert_eq!(db.len(), 100);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod model;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::model::*;
    pub use crate::stress::*;
}

pub use fixtures::*;
pub use generators::*;
pub use model::*;
pub use stress::*;
