//! Transaction state.

use crate::error::CoreResult;
use crate::transaction::buffer::{PendingWrite, TransactionBuffer};
use crate::types::TransactionId;

/// Lifecycle state of a database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// No transaction is open. Only reads are accepted.
    Idle,
    /// A transaction is open and buffering writes.
    Active,
}

/// The open transaction: its id plus the writes it has buffered.
#[derive(Debug)]
pub struct Transaction<'k, V> {
    id: TransactionId,
    buffer: TransactionBuffer<'k, V>,
}

impl<'k, V: Copy> Transaction<'k, V> {
    pub(crate) fn new(id: TransactionId, buffer: TransactionBuffer<'k, V>) -> Self {
        Self { id, buffer }
    }

    /// Returns the transaction ID.
    #[must_use]
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Records a put.
    pub(crate) fn put(&mut self, key: &'k str, value: V) -> CoreResult<()> {
        self.buffer.append(key, value)
    }

    /// Returns the number of buffered writes.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.buffer.len()
    }

    /// Returns the current buffer capacity.
    #[must_use]
    pub fn buffer_capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Returns all pending writes in order.
    pub fn pending_writes(&self) -> impl Iterator<Item = &PendingWrite<'k, V>> {
        self.buffer.iter()
    }
}
