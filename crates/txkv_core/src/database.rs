//! Database facade.

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::stats::DatabaseStats;
use crate::table::CommittedTable;
use crate::transaction::{TransactionManager, TransactionState};
use crate::types::{CommitSummary, TransactionId};
use tracing::debug;

/// The main database handle.
///
/// `Database` composes the committed table with the transaction manager. It
/// provides:
/// - Reads of committed state with [`get`](Self::get)
/// - A single read-write transaction via [`begin`](Self::begin),
///   [`put`](Self::put), [`commit`](Self::commit) and
///   [`rollback`](Self::rollback)
/// - Closure-scoped transactions via [`transaction`](Self::transaction)
///
/// # Key Lifetime
///
/// Keys are borrowed, never copied. Every key passed to `put` must outlive
/// the database, which the `'k` lifetime enforces.
///
/// # Example
///
/// ```rust
/// use txkv_core::{CoreError, Database};
///
/// let mut db: Database = Database::new();
/// assert_eq!(db.put("A", 5), Err(CoreError::NoActiveTransaction));
///
/// db.begin().unwrap();
/// db.put("A", 5).unwrap();
/// db.put("A", 6).unwrap();
/// assert_eq!(db.get("A"), None);
///
/// db.commit().unwrap();
/// assert_eq!(db.get("A"), Some(&6));
/// ```
#[derive(Debug)]
pub struct Database<'k, V = i32> {
    /// Configuration.
    config: Config,
    /// Committed state.
    table: CommittedTable<'k, V>,
    /// Transaction manager.
    txn_manager: TransactionManager<'k, V>,
    /// Operation counters.
    stats: DatabaseStats,
}

impl<'k, V: Copy> Default for Database<'k, V> {
    fn default() -> Self {
        Self::from_validated(Config::default())
    }
}

impl<'k, V: Copy> Database<'k, V> {
    /// Creates an empty database with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty database with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if the configuration does not
    /// validate.
    ///
    /// # Example
    ///
    /// ```rust
    /// use txkv_core::{Config, Database};
    ///
    /// let config = Config::default()
    ///     .initial_table_capacity(64)
    ///     .max_load_percent(50);
    /// let db: Database = Database::with_config(config).unwrap();
    /// assert_eq!(db.capacity(), 0);
    /// ```
    pub fn with_config(config: Config) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: Config) -> Self {
        Self {
            table: CommittedTable::new(),
            txn_manager: TransactionManager::from_validated(&config),
            stats: DatabaseStats::new(),
            config,
        }
    }

    /// Returns the committed value for `key`.
    ///
    /// Writes of an open transaction are never visible here. The reference is
    /// valid until the next mutating call on this database.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        let value = self.table.get(key);
        self.stats.record_read(value.is_some());
        value
    }

    /// Returns true if `key` has a committed value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    /// Buffers a write in the open transaction.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NoActiveTransaction`] if no transaction is open
    /// - [`CoreError::ResourceExhausted`] if the buffer cannot grow; earlier
    ///   writes are kept and the transaction stays open
    pub fn put(&mut self, key: &'k str, value: V) -> CoreResult<()> {
        let result = self.txn_manager.put(key, value);
        if result.is_ok() {
            self.stats.record_write();
        }
        self.track(result)
    }

    /// Opens a transaction.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::TransactionAlreadyActive`] if one is open.
    pub fn begin(&mut self) -> CoreResult<TransactionId> {
        let result = self.txn_manager.begin();
        if result.is_ok() {
            self.stats.record_transaction_start();
        }
        self.track(result)
    }

    /// Applies the open transaction to committed state and closes it.
    ///
    /// For every key written in the transaction, the last value put wins. A
    /// failed commit changes nothing and leaves the transaction open, ready to
    /// be retried or rolled back.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NoActiveTransaction`] if no transaction is open
    /// - [`CoreError::CapacityOverflow`] if the table cannot grow enough
    /// - [`CoreError::ResourceExhausted`] if the grown table cannot be
    ///   allocated
    pub fn commit(&mut self) -> CoreResult<CommitSummary> {
        let result = self.txn_manager.commit(&mut self.table);
        if let Ok(summary) = &result {
            self.stats.record_transaction_commit(summary.grew());
        }
        self.track(result)
    }

    /// Discards the open transaction. Committed state is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoActiveTransaction`] if no transaction is open.
    pub fn rollback(&mut self) -> CoreResult<()> {
        let result = self.txn_manager.rollback().map(|_| ());
        if result.is_ok() {
            self.stats.record_transaction_rollback();
        }
        self.track(result)
    }

    /// Runs `f` inside a transaction.
    ///
    /// The transaction commits if `f` returns `Ok` and rolls back if it
    /// returns `Err` or if the commit fails. `f` must not end the transaction
    /// itself.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::TransactionAlreadyActive`] if a transaction is
    /// already open, or the first error raised by `f` or the commit.
    ///
    /// # Example
    ///
    /// ```rust
    /// use txkv_core::Database;
    ///
    /// let mut db: Database = Database::new();
    /// db.transaction(|db| {
    ///     db.put("apples", 3)?;
    ///     db.put("pears", 7)
    /// })
    /// .unwrap();
    /// assert_eq!(db.get("pears"), Some(&7));
    /// ```
    pub fn transaction<F, T>(&mut self, f: F) -> CoreResult<T>
    where
        F: FnOnce(&mut Self) -> CoreResult<T>,
    {
        self.begin()?;
        let result = f(self).and_then(|value| {
            debug_assert!(
                self.is_active(),
                "transaction closure must not commit or roll back"
            );
            self.commit().map(|_| value)
        });
        if result.is_err() && self.is_active() {
            self.rollback()?;
        }
        result
    }

    /// Releases all storage and resets the database to its freshly created
    /// state. An open transaction is discarded.
    pub fn destroy(&mut self) {
        debug!(
            entries = self.table.len(),
            capacity = self.table.capacity(),
            "database destroyed"
        );
        *self = Self::from_validated(self.config.clone());
    }

    /// Returns the transaction lifecycle state.
    #[must_use]
    pub fn state(&self) -> TransactionState {
        self.txn_manager.state()
    }

    /// Returns true if a transaction is open.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state() == TransactionState::Active
    }

    /// Returns the id of the open transaction, if any.
    #[must_use]
    pub fn active_transaction(&self) -> Option<TransactionId> {
        self.txn_manager.active().map(|txn| txn.id())
    }

    /// Returns the number of writes buffered by the open transaction.
    #[must_use]
    pub fn pending_writes(&self) -> usize {
        self.txn_manager
            .active()
            .map_or(0, |txn| txn.write_count())
    }

    /// Returns the number of committed keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns true if nothing has been committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the committed table's slot count.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the operation counters.
    #[must_use]
    pub fn stats(&self) -> &DatabaseStats {
        &self.stats
    }

    fn track<T>(&self, result: Result<T, CoreError>) -> CoreResult<T> {
        if let Err(err) = &result {
            self.stats.record_error();
            if !err.is_state_error() {
                debug!(error = %err, "operation failed");
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_db<'k>() -> Database<'k> {
        Database::new()
    }

    #[test]
    fn get_missing_key() {
        let db = create_db();
        assert!(db.get("A").is_none());
        assert!(db.is_empty());
    }

    #[test]
    fn reference_scenario() {
        let mut db = create_db();

        assert_eq!(db.get("A"), None);
        assert_eq!(db.put("A", 5), Err(CoreError::NoActiveTransaction));
        db.begin().unwrap();
        db.put("A", 5).unwrap();
        assert_eq!(db.get("A"), None);
        db.put("A", 6).unwrap();
        db.commit().unwrap();
        assert_eq!(db.get("A"), Some(&6));
        assert_eq!(db.commit(), Err(CoreError::NoActiveTransaction));
        assert_eq!(db.rollback(), Err(CoreError::NoActiveTransaction));
        assert_eq!(db.get("B"), None);
        db.begin().unwrap();
        db.put("B", 10).unwrap();
        db.rollback().unwrap();
        assert_eq!(db.get("B"), None);
    }

    #[test]
    fn begin_while_active_fails() {
        let mut db = create_db();
        let txid = db.begin().unwrap();
        db.put("A", 1).unwrap();

        assert_eq!(db.begin(), Err(CoreError::TransactionAlreadyActive));
        assert_eq!(db.active_transaction(), Some(txid));
        assert_eq!(db.pending_writes(), 1);
    }

    #[test]
    fn commit_overrides_committed_value() {
        let mut db = create_db();
        db.transaction(|db| db.put("A", 1)).unwrap();
        db.transaction(|db| db.put("A", 2)).unwrap();

        assert_eq!(db.get("A"), Some(&2));
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn transaction_rolls_back_on_error() {
        let mut db = create_db();
        let result: CoreResult<()> = db.transaction(|db| {
            db.put("A", 1)?;
            Err(CoreError::invalid_config("abort"))
        });

        assert!(result.is_err());
        assert!(!db.is_active());
        assert!(db.get("A").is_none());
        assert_eq!(db.stats().transactions_rolled_back(), 1);
    }

    #[test]
    fn transaction_requires_idle() {
        let mut db = create_db();
        db.begin().unwrap();
        let result = db.transaction(|db| db.put("A", 1));
        assert_eq!(result, Err(CoreError::TransactionAlreadyActive));
        assert!(db.is_active());
    }

    #[test]
    fn destroy_resets_everything() {
        let mut db = create_db();
        db.transaction(|db| db.put("A", 1)).unwrap();
        db.begin().unwrap();
        db.put("B", 2).unwrap();

        db.destroy();

        assert!(db.get("A").is_none());
        assert_eq!(db.capacity(), 0);
        assert!(!db.is_active());
        assert_eq!(db.stats().transactions_committed(), 0);

        db.transaction(|db| db.put("A", 3)).unwrap();
        assert_eq!(db.get("A"), Some(&3));
    }

    #[test]
    fn with_config_validates() {
        let result: CoreResult<Database<'_>> =
            Database::with_config(Config::default().max_load_percent(0));
        assert!(matches!(result, Err(CoreError::InvalidConfig { .. })));
    }

    #[test]
    fn stats_track_operations() {
        let mut db = create_db();
        let _ = db.put("A", 1);
        db.begin().unwrap();
        db.put("A", 1).unwrap();
        db.commit().unwrap();
        let _ = db.get("A");
        let _ = db.get("B");

        let stats = db.stats().snapshot();
        assert_eq!(stats.writes, 1);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.reads, 2);
        assert_eq!(stats.read_hits, 1);
        assert_eq!(stats.transactions_committed, 1);
        assert_eq!(stats.table_growths, 1);
    }

    #[test]
    fn generic_value_type() {
        let mut db: Database<'_, (u8, f64)> = Database::new();
        db.transaction(|db| db.put("point", (1, 2.5))).unwrap();
        assert_eq!(db.get("point"), Some(&(1, 2.5)));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "transaction closure must not commit or roll back")]
    fn closure_ending_transaction_is_caught() {
        let mut db = create_db();
        let _ = db.transaction(|db| {
            db.put("A", 1)?;
            db.commit().map(|_| ())
        });
    }

    #[test]
    fn destroy_keeps_configuration() {
        let config = Config::default().max_load_percent(50);
        let mut db: Database = Database::with_config(config.clone()).unwrap();
        db.transaction(|db| db.put("A", 1)).unwrap();
        db.destroy();
        assert_eq!(db.config(), &config);
        assert!(db.is_empty());
    }
}
