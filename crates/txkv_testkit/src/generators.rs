//! Property-based test generators using proptest.
//!
//! Operations address keys by index into a small pool so that generated
//! sequences hit the same keys repeatedly: overwrites inside a transaction,
//! overwrites of committed values, and lookups of both present and absent
//! keys.

use proptest::prelude::*;

/// A single database call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Open a transaction.
    Begin,
    /// Buffer a write.
    Put {
        /// Index into the key pool.
        key: usize,
        /// Value to write.
        value: i32,
    },
    /// Read a committed value.
    Get {
        /// Index into the key pool.
        key: usize,
    },
    /// Commit the open transaction.
    Commit,
    /// Roll back the open transaction.
    Rollback,
}

/// Strategy for generating key pool members.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9_]{0,12}").expect("Invalid regex")
}

/// Strategy for generating a pool of `1..max` distinct keys.
pub fn key_pool_strategy(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set(key_strategy(), 1..max.max(2))
        .prop_map(|keys| keys.into_iter().collect())
}

/// Strategy for generating operations against a pool of `pool_size` keys.
///
/// Puts dominate so that transactions carry enough writes to grow the table.
pub fn operation_strategy(pool_size: usize) -> impl Strategy<Value = Operation> {
    let max_key = pool_size.max(1);
    prop_oneof![
        1 => Just(Operation::Begin),
        6 => (0..max_key, any::<i32>()).prop_map(|(key, value)| Operation::Put { key, value }),
        3 => (0..max_key).prop_map(|key| Operation::Get { key }),
        1 => Just(Operation::Commit),
        1 => Just(Operation::Rollback),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn operation_sequence_strategy(
    pool_size: usize,
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<Operation>> {
    prop::collection::vec(operation_strategy(pool_size), min_ops..max_ops)
}

/// Strategy for generating a key pool together with operations over it.
pub fn workload_strategy(
    max_keys: usize,
    max_ops: usize,
) -> impl Strategy<Value = (Vec<String>, Vec<Operation>)> {
    key_pool_strategy(max_keys).prop_flat_map(move |keys| {
        let pool_size = keys.len();
        (Just(keys), operation_sequence_strategy(pool_size, 1, max_ops))
    })
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
