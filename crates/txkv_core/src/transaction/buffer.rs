//! Transaction write buffer.

use crate::error::{CoreError, CoreResult};

/// A buffered write waiting for commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingWrite<'k, V> {
    /// Borrowed key.
    pub key: &'k str,
    /// Value to store on commit.
    pub value: V,
}

/// Insertion-ordered log of writes made by the active transaction.
///
/// Writes are never deduplicated here. Two puts to the same key are both
/// kept, in order, and the merge into the committed table applies them in
/// sequence so the later one wins.
///
/// Capacity doubles whenever an append finds the buffer full.
#[derive(Debug)]
pub struct TransactionBuffer<'k, V> {
    writes: Vec<PendingWrite<'k, V>>,
    /// Hard cap on buffered writes.
    max_writes: usize,
}

impl<'k, V: Copy> TransactionBuffer<'k, V> {
    /// Creates an empty buffer with room for `initial_capacity` writes.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ResourceExhausted`] if the initial allocation
    /// fails.
    pub fn with_capacity(initial_capacity: usize, max_writes: usize) -> CoreResult<Self> {
        let initial_capacity = initial_capacity.min(max_writes);
        let mut writes = Vec::new();
        writes
            .try_reserve_exact(initial_capacity)
            .map_err(|_| CoreError::resource_exhausted(initial_capacity))?;
        Ok(Self { writes, max_writes })
    }

    /// Appends a write.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ResourceExhausted`] if the buffer is full and
    /// cannot grow. The buffer is left unchanged in that case.
    pub fn append(&mut self, key: &'k str, value: V) -> CoreResult<()> {
        let len = self.writes.len();
        if len >= self.max_writes {
            return Err(CoreError::resource_exhausted(len + 1));
        }
        if len == self.writes.capacity() {
            self.grow()?;
        }
        self.writes.push(PendingWrite { key, value });
        Ok(())
    }

    /// Returns the number of buffered writes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Returns the number of writes the buffer holds before growing.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.writes.capacity()
    }

    /// Iterates over writes in the order they were made.
    pub fn iter(&self) -> impl Iterator<Item = &PendingWrite<'k, V>> {
        self.writes.iter()
    }

    fn grow(&mut self) -> CoreResult<()> {
        let len = self.writes.len();
        let target = len.max(1).saturating_mul(2).min(self.max_writes);
        self.writes
            .try_reserve_exact(target - len)
            .map_err(|_| CoreError::resource_exhausted(target))
    }
}
