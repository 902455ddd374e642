//! Model-based checking.
//!
//! [`ModelHarness`] drives a [`Database`] and a `HashMap` reference model
//! with the same operations and asserts that every result agrees.

use crate::generators::Operation;
use std::collections::HashMap;
use txkv_core::{Config, CoreError, CoreResult, Database};

/// A database paired with a reference model.
pub struct ModelHarness<'k> {
    /// The database under test.
    pub db: Database<'k>,
    /// Committed state as the model sees it.
    committed: HashMap<&'k str, i32>,
    /// Writes of the open transaction, in order. `None` while idle.
    pending: Option<Vec<(&'k str, i32)>>,
}

impl<'k> ModelHarness<'k> {
    /// Creates a harness over a default database.
    pub fn new() -> Self {
        Self::with_database(Database::new())
    }

    /// Creates a harness over a database with a custom configuration.
    ///
    /// The model has no notion of capacity limits; workloads must stay below
    /// `max_table_capacity` and `max_pending_writes`.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid.
    pub fn with_config(config: Config) -> Self {
        Self::with_database(Database::with_config(config).expect("Invalid configuration"))
    }

    fn with_database(db: Database<'k>) -> Self {
        Self {
            db,
            committed: HashMap::new(),
            pending: None,
        }
    }

    /// Applies one operation to both sides.
    ///
    /// # Panics
    ///
    /// Panics if the database disagrees with the model.
    pub fn apply(&mut self, keys: &'k [String], op: Operation) {
        match op {
            Operation::Begin => {
                let expected = if self.pending.is_some() {
                    Err(CoreError::TransactionAlreadyActive)
                } else {
                    self.pending = Some(Vec::new());
                    Ok(())
                };
                assert_eq!(self.db.begin().map(|_| ()), expected, "begin");
            }
            Operation::Put { key, value } => {
                let key = keys[key].as_str();
                let expected = match self.pending.as_mut() {
                    Some(writes) => {
                        writes.push((key, value));
                        Ok(())
                    }
                    None => Err(CoreError::NoActiveTransaction),
                };
                assert_eq!(self.db.put(key, value), expected, "put {key:?}");
            }
            Operation::Get { key } => {
                let key = keys[key].as_str();
                assert_eq!(
                    self.db.get(key),
                    self.committed.get(key),
                    "get {key:?}"
                );
            }
            Operation::Commit => {
                let expected: CoreResult<()> = match self.pending.take() {
                    Some(writes) => {
                        self.committed.extend(writes);
                        Ok(())
                    }
                    None => Err(CoreError::NoActiveTransaction),
                };
                assert_eq!(self.db.commit().map(|_| ()), expected, "commit");
            }
            Operation::Rollback => {
                let expected = match self.pending.take() {
                    Some(_) => Ok(()),
                    None => Err(CoreError::NoActiveTransaction),
                };
                assert_eq!(self.db.rollback(), expected, "rollback");
            }
        }

        assert_eq!(self.db.is_active(), self.pending.is_some());
        assert_eq!(self.db.len(), self.committed.len());
    }

    /// Applies a sequence of operations, then checks every key.
    ///
    /// # Panics
    ///
    /// Panics on the first disagreement.
    pub fn run(&mut self, keys: &'k [String], ops: &[Operation]) {
        for &op in ops {
            self.apply(keys, op);
        }
        self.verify_all(keys);
    }

    /// Checks that every key of `keys` reads the same on both sides.
    ///
    /// # Panics
    ///
    /// Panics on the first disagreement.
    pub fn verify_all(&self, keys: &[String]) {
        for key in keys {
            assert_eq!(
                self.db.get(key),
                self.committed.get(key.as_str()),
                "committed value mismatch for {key:?}"
            );
        }
    }

    /// Returns the number of keys the model holds.
    pub fn committed_count(&self) -> usize {
        self.committed.len()
    }
}

impl Default for ModelHarness<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{workload_strategy, PropTestConfig};
    use proptest::prelude::*;

    #[test]
    fn scripted_sequence_agrees() {
        let keys = vec!["A".to_string(), "B".to_string()];
        let mut harness = ModelHarness::new();
        harness.run(
            &keys,
            &[
                Operation::Get { key: 0 },
                Operation::Put { key: 0, value: 5 },
                Operation::Begin,
                Operation::Put { key: 0, value: 5 },
                Operation::Get { key: 0 },
                Operation::Put { key: 0, value: 6 },
                Operation::Commit,
                Operation::Get { key: 0 },
                Operation::Commit,
                Operation::Rollback,
                Operation::Begin,
                Operation::Put { key: 1, value: 10 },
                Operation::Rollback,
                Operation::Get { key: 1 },
            ],
        );
        assert_eq!(harness.committed_count(), 1);
    }

    proptest! {
        #![proptest_config(PropTestConfig::default().to_proptest_config())]

        #[test]
        fn database_matches_model((keys, ops) in workload_strategy(64, 400)) {
            let mut harness = ModelHarness::new();
            harness.run(&keys, &ops);
        }

        #[test]
        fn small_tables_match_model((keys, ops) in workload_strategy(40, 300)) {
            let config = Config::default()
                .initial_table_capacity(1)
                .initial_buffer_capacity(1)
                .max_load_percent(90);
            let mut harness = ModelHarness::with_config(config);
            harness.run(&keys, &ops);
        }
    }
}
