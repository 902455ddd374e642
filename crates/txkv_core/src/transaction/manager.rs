//! Transaction manager.

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::table::CommittedTable;
use crate::transaction::buffer::TransactionBuffer;
use crate::transaction::state::{Transaction, TransactionState};
use crate::types::{CommitSummary, InsertOutcome, TransactionId};
use tracing::{debug, trace};

/// Decides how large the committed table must be to absorb a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthPolicy {
    /// Capacity allocated when the table has no slots yet.
    initial_capacity: usize,
    /// Largest capacity the table may reach.
    max_capacity: usize,
    /// Highest occupancy after a commit, in percent. Always below 100, so a
    /// table within bounds keeps an empty slot.
    max_load_percent: u8,
}

impl GrowthPolicy {
    /// Builds the policy from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if the configuration does not
    /// validate.
    pub fn from_config(config: &Config) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    pub(crate) fn from_validated(config: &Config) -> Self {
        Self {
            initial_capacity: config.initial_table_capacity,
            max_capacity: config.max_table_capacity,
            max_load_percent: config.max_load_percent,
        }
    }

    /// Returns how many entries a table of `capacity` slots may hold, i.e.
    /// `floor(capacity * max_load_percent / 100)` without overflowing.
    #[must_use]
    pub fn max_entries(&self, capacity: usize) -> usize {
        let percent = usize::from(self.max_load_percent);
        capacity / 100 * percent + capacity % 100 * percent / 100
    }

    /// Returns the capacity needed to hold `required` entries, starting from
    /// `current` and doubling.
    ///
    /// The result equals `current` when no growth is needed.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CapacityOverflow`] if doubling would leave the
    /// representable range or pass `max_capacity` before the load bound holds.
    pub fn plan(&self, current: usize, required: usize) -> CoreResult<usize> {
        let mut capacity = if current == 0 {
            self.initial_capacity
        } else {
            current
        };
        if capacity == 0 {
            return Err(CoreError::invalid_config(
                "initial table capacity must be non-zero",
            ));
        }

        while self.max_entries(capacity) < required {
            capacity = capacity
                .checked_mul(2)
                .filter(|doubled| *doubled <= self.max_capacity)
                .ok_or(CoreError::capacity_overflow(required))?;
        }
        Ok(capacity)
    }
}

/// Manages the single read-write transaction of a database.
///
/// The transaction manager provides:
/// - The `Idle`/`Active` state machine
/// - Buffering of writes for the open transaction
/// - The merge of a committed transaction into the table, including growth
///
/// ## Failure Atomicity
///
/// A commit that fails leaves both the table and the open transaction as
/// they were. Growth builds the replacement table off to the side and only
/// swaps it in once every write has landed; the in-place path runs only when
/// the table already has room for every write, so it cannot fail midway.
#[derive(Debug)]
pub struct TransactionManager<'k, V> {
    /// Open transaction, if any.
    active: Option<Transaction<'k, V>>,
    /// Id handed to the next `begin`.
    next_txid: TransactionId,
    policy: GrowthPolicy,
    initial_buffer_capacity: usize,
    max_pending_writes: usize,
}

impl<'k, V: Copy> TransactionManager<'k, V> {
    /// Creates a transaction manager.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if the configuration does not
    /// validate.
    pub fn new(config: &Config) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    pub(crate) fn from_validated(config: &Config) -> Self {
        Self {
            active: None,
            next_txid: TransactionId::new(1),
            policy: GrowthPolicy::from_validated(config),
            initial_buffer_capacity: config.initial_buffer_capacity,
            max_pending_writes: config.max_pending_writes,
        }
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> TransactionState {
        if self.active.is_some() {
            TransactionState::Active
        } else {
            TransactionState::Idle
        }
    }

    /// Returns the open transaction, if any.
    #[must_use]
    pub fn active(&self) -> Option<&Transaction<'k, V>> {
        self.active.as_ref()
    }

    /// Opens a transaction with an empty buffer.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::TransactionAlreadyActive`] if one is open, or
    /// [`CoreError::ResourceExhausted`] if the buffer cannot be allocated.
    pub fn begin(&mut self) -> CoreResult<TransactionId> {
        if self.active.is_some() {
            return Err(CoreError::TransactionAlreadyActive);
        }

        let buffer =
            TransactionBuffer::with_capacity(self.initial_buffer_capacity, self.max_pending_writes)?;
        let txid = self.next_txid;
        self.next_txid = txid.next();
        self.active = Some(Transaction::new(txid, buffer));

        debug!(%txid, "transaction started");
        Ok(txid)
    }

    /// Buffers a write in the open transaction.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoActiveTransaction`] when idle, or
    /// [`CoreError::ResourceExhausted`] if the buffer cannot grow.
    pub fn put(&mut self, key: &'k str, value: V) -> CoreResult<()> {
        let txn = self
            .active
            .as_mut()
            .ok_or(CoreError::NoActiveTransaction)?;
        txn.put(key, value)
    }

    /// Merges the open transaction into `table` and closes it.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoActiveTransaction`] when idle. Growth failures
    /// return [`CoreError::CapacityOverflow`] or
    /// [`CoreError::ResourceExhausted`] and keep the transaction open.
    pub fn commit(&mut self, table: &mut CommittedTable<'k, V>) -> CoreResult<CommitSummary> {
        let txn = self.active.as_ref().ok_or(CoreError::NoActiveTransaction)?;
        let summary = merge(&self.policy, table, txn)?;
        self.active = None;

        debug!(
            txid = %summary.txid,
            applied = summary.applied,
            inserted = summary.inserted,
            updated = summary.updated,
            "transaction committed"
        );
        Ok(summary)
    }

    /// Discards the open transaction.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoActiveTransaction`] when idle.
    pub fn rollback(&mut self) -> CoreResult<TransactionId> {
        let txn = self.active.take().ok_or(CoreError::NoActiveTransaction)?;
        debug!(txid = %txn.id(), discarded = txn.write_count(), "transaction rolled back");
        Ok(txn.id())
    }
}

/// Applies `txn` to `table`, growing and rehashing first if the post-merge
/// size would break the load bound.
fn merge<'k, V: Copy>(
    policy: &GrowthPolicy,
    table: &mut CommittedTable<'k, V>,
    txn: &Transaction<'k, V>,
) -> CoreResult<CommitSummary> {
    let required = table
        .len()
        .checked_add(txn.write_count())
        .ok_or(CoreError::capacity_overflow(usize::MAX))?;
    let previous_capacity = table.capacity();
    let capacity = policy.plan(previous_capacity, required)?;

    let (inserted, updated) = if capacity > previous_capacity {
        let mut grown = CommittedTable::with_capacity(capacity)?;
        table.rehash_into(&mut grown)?;
        let counts = apply_writes(&mut grown, txn)?;
        *table = grown;

        debug!(
            txid = %txn.id(),
            from = previous_capacity,
            to = capacity,
            "committed table grown"
        );
        counts
    } else {
        trace!(txid = %txn.id(), capacity, "merging in place");
        apply_writes(table, txn)?
    };

    Ok(CommitSummary {
        txid: txn.id(),
        applied: txn.write_count(),
        inserted,
        updated,
        previous_capacity,
        capacity,
    })
}

/// Inserts writes in buffer order; returns `(inserted, updated)` counts.
fn apply_writes<'k, V: Copy>(
    table: &mut CommittedTable<'k, V>,
    txn: &Transaction<'k, V>,
) -> CoreResult<(usize, usize)> {
    let mut inserted = 0;
    let mut updated = 0;
    for write in txn.pending_writes() {
        match table.insert(write.key, write.value)? {
            InsertOutcome::Inserted => inserted += 1,
            InsertOutcome::Updated => updated += 1,
        }
    }
    Ok((inserted, updated))
}
