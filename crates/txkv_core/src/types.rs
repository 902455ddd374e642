//! Core type definitions for txkv.

use std::fmt;

/// Unique identifier for a transaction.
///
/// Transaction IDs are monotonically increasing and never reused within a
/// database instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransactionId(pub u64);

impl TransactionId {
    /// Creates a new transaction ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns the next transaction ID.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "txn:{}", self.0)
    }
}

/// Whether a committed-table insert created a slot or overwrote one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The key was not present and now occupies a new slot.
    Inserted,
    /// The key was present and its value was replaced.
    Updated,
}

/// What a successful commit did to the committed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitSummary {
    /// The committed transaction.
    pub txid: TransactionId,
    /// Buffered writes applied, duplicates included.
    pub applied: usize,
    /// Writes that created a new key.
    pub inserted: usize,
    /// Writes that overwrote an existing key (committed or earlier in the
    /// same transaction).
    pub updated: usize,
    /// Table capacity before the commit.
    pub previous_capacity: usize,
    /// Table capacity after the commit.
    pub capacity: usize,
}

impl CommitSummary {
    /// Returns true if the commit reallocated and rehashed the table.
    #[must_use]
    pub const fn grew(&self) -> bool {
        self.capacity > self.previous_capacity
    }
}
