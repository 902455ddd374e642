//! Database statistics.
//!
//! Counters are atomic so that `get`, which only borrows the database
//! shared, can still record reads.
//!
//! # Usage
//!
//! ```rust
//! use txkv_core::Database;
//!
//! let mut db: Database = Database::new();
//! db.begin().unwrap();
//! db.put("A", 1).unwrap();
//! db.commit().unwrap();
//! let _ = db.get("A");
//!
//! let stats = db.stats().snapshot();
//! assert_eq!(stats.reads, 1);
//! assert_eq!(stats.transactions_committed, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Database statistics and metrics.
///
/// Values only ever increase.
#[derive(Debug, Default)]
pub struct DatabaseStats {
    /// Total number of `get` calls.
    reads: AtomicU64,
    /// `get` calls that found a committed value.
    read_hits: AtomicU64,
    /// Total number of successful `put` calls.
    writes: AtomicU64,
    /// Total number of transactions started.
    transactions_started: AtomicU64,
    /// Total number of transactions committed.
    transactions_committed: AtomicU64,
    /// Total number of transactions rolled back.
    transactions_rolled_back: AtomicU64,
    /// Commits that reallocated and rehashed the committed table.
    table_growths: AtomicU64,
    /// Total number of failed operations.
    errors: AtomicU64,
}

impl DatabaseStats {
    /// Creates a new stats instance.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_read(&self, hit: bool) {
        self.reads.fetch_add(1, Ordering::Relaxed);
        if hit {
            self.read_hits.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_transaction_start(&self) {
        self.transactions_started.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_transaction_commit(&self, grew: bool) {
        self.transactions_committed.fetch_add(1, Ordering::Relaxed);
        if grew {
            self.table_growths.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_transaction_rollback(&self) {
        self.transactions_rolled_back.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the total number of reads.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Returns the number of reads that found a value.
    pub fn read_hits(&self) -> u64 {
        self.read_hits.load(Ordering::Relaxed)
    }

    /// Returns the total number of writes.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Returns the total number of transactions started.
    pub fn transactions_started(&self) -> u64 {
        self.transactions_started.load(Ordering::Relaxed)
    }

    /// Returns the total number of transactions committed.
    pub fn transactions_committed(&self) -> u64 {
        self.transactions_committed.load(Ordering::Relaxed)
    }

    /// Returns the total number of transactions rolled back.
    pub fn transactions_rolled_back(&self) -> u64 {
        self.transactions_rolled_back.load(Ordering::Relaxed)
    }

    /// Returns the number of commits that grew the table.
    pub fn table_growths(&self) -> u64 {
        self.table_growths.load(Ordering::Relaxed)
    }

    /// Returns the total number of errors.
    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    /// Returns a snapshot of all stats.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            reads: self.reads(),
            read_hits: self.read_hits(),
            writes: self.writes(),
            transactions_started: self.transactions_started(),
            transactions_committed: self.transactions_committed(),
            transactions_rolled_back: self.transactions_rolled_back(),
            table_growths: self.table_growths(),
            errors: self.errors(),
        }
    }
}

/// A point-in-time snapshot of database statistics.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// Total number of reads.
    pub reads: u64,
    /// Reads that found a value.
    pub read_hits: u64,
    /// Total number of writes.
    pub writes: u64,
    /// Total number of transactions started.
    pub transactions_started: u64,
    /// Total number of transactions committed.
    pub transactions_committed: u64,
    /// Total number of transactions rolled back.
    pub transactions_rolled_back: u64,
    /// Commits that grew the table.
    pub table_growths: u64,
    /// Total number of errors.
    pub errors: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stats_are_zero() {
        let stats = DatabaseStats::new();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn record_reads() {
        let stats = DatabaseStats::new();
        stats.record_read(true);
        stats.record_read(false);
        assert_eq!(stats.reads(), 2);
        assert_eq!(stats.read_hits(), 1);
    }

    #[test]
    fn record_transactions() {
        let stats = DatabaseStats::new();

        stats.record_transaction_start();
        stats.record_transaction_start();
        stats.record_transaction_commit(true);
        stats.record_transaction_rollback();

        let snap = stats.snapshot();
        assert_eq!(snap.transactions_started, 2);
        assert_eq!(snap.transactions_committed, 1);
        assert_eq!(snap.transactions_rolled_back, 1);
        assert_eq!(snap.table_growths, 1);
    }
}
