//! Test fixtures and database helpers.
//!
//! The database borrows its keys, so fixtures hand out owned [`KeySet`]s that
//! the test keeps alive for as long as the database.

use txkv_core::{Config, Database};

/// An owned, ordered collection of generated keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySet {
    keys: Vec<String>,
}

impl KeySet {
    /// Creates `count` keys named `{prefix}{index}`.
    pub fn new(prefix: &str, count: usize) -> Self {
        Self {
            keys: (0..count).map(|i| format!("{prefix}{i}")).collect(),
        }
    }

    /// Returns the key at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn key(&self, index: usize) -> &str {
        &self.keys[index]
    }

    /// Iterates over the keys in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// The value [`populated_database`] stores for the key at `index`.
pub fn fixture_value(index: usize) -> i32 {
    (index as i32).wrapping_mul(7).wrapping_add(3)
}

/// Creates a database holding every key of `keys`, committed in batches of
/// `batch_size`. Key `i` maps to [`fixture_value`]`(i)`.
///
/// # Panics
///
/// Panics if a commit fails.
pub fn populated_database(keys: &KeySet, batch_size: usize) -> Database<'_> {
    populated_database_with_config(keys, batch_size, Config::default())
}

/// Like [`populated_database`] with a custom configuration.
///
/// # Panics
///
/// Panics if the configuration is invalid or a commit fails.
pub fn populated_database_with_config(
    keys: &KeySet,
    batch_size: usize,
    config: Config,
) -> Database<'_> {
    let mut db = Database::with_config(config).expect("Invalid configuration");
    let indexed: Vec<(usize, &str)> = keys.iter().enumerate().collect();

    for batch in indexed.chunks(batch_size.max(1)) {
        db.transaction(|db| {
            for &(index, key) in batch {
                db.put(key, fixture_value(index))?;
            }
            Ok(())
        })
        .expect("Failed to commit fixture batch");
    }

    db
}

/// Asserts that every key of `keys` holds its fixture value.
///
/// # Panics
///
/// Panics on the first mismatch.
pub fn assert_fixture_values(db: &Database<'_>, keys: &KeySet) {
    for (index, key) in keys.iter().enumerate() {
        assert_eq!(
            db.get(key).copied(),
            Some(fixture_value(index)),
            "Fixture value mismatch for {key}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_set_names() {
        let keys = KeySet::new("k", 3);
        assert_eq!(keys.iter().collect::<Vec<_>>(), vec!["k0", "k1", "k2"]);
        assert_eq!(keys.key(1), "k1");
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn populated_database_holds_all_keys() {
        let keys = KeySet::new("fixture", 50);
        let db = populated_database(&keys, 8);

        assert_eq!(db.len(), 50);
        assert!(!db.is_active());
        assert_fixture_values(&db, &keys);
        assert_eq!(db.stats().transactions_committed(), 7);
    }

    #[test]
    fn populated_database_with_small_table() {
        let keys = KeySet::new("small", 20);
        let config = Config::default().initial_table_capacity(2);
        let db = populated_database_with_config(&keys, 3, config);

        assert_eq!(db.capacity(), 32);
        assert_fixture_values(&db, &keys);
    }
}
