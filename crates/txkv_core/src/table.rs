//! Committed key/value table.
//!
//! `CommittedTable` is an open-addressed hash table with linear probing. It
//! holds the state every reader sees. Keys are borrowed for `'k`; the table
//! never copies key storage.
//!
//! There are no deletions, so a probe chain is never interrupted: every key
//! inserted with hash `h` is reachable by walking from `h mod capacity` until
//! the first empty slot.

use crate::error::{CoreError, CoreResult};
use crate::hash::hash_str;
use crate::types::InsertOutcome;

/// An occupied slot.
#[derive(Debug, Clone, Copy)]
struct Entry<'k, V> {
    key: &'k str,
    /// Cached `hash_str(key)`, compared before the key itself.
    hash: u64,
    value: V,
}

/// Result of walking a probe chain.
enum Probe {
    /// The key lives at this index.
    Occupied(usize),
    /// The key is absent; this is the first empty slot on its chain.
    Vacant(usize),
    /// Every slot was visited without a match or an empty slot.
    Exhausted,
}

/// Open-addressed hash table holding committed entries.
#[derive(Debug)]
pub struct CommittedTable<'k, V> {
    slots: Vec<Option<Entry<'k, V>>>,
    len: usize,
}

impl<'k, V> Default for CommittedTable<'k, V> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
        }
    }
}

impl<'k, V: Copy> CommittedTable<'k, V> {
    /// Creates an empty table with no slots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table with exactly `capacity` slots.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ResourceExhausted`] if the slots cannot be
    /// allocated.
    pub fn with_capacity(capacity: usize) -> CoreResult<Self> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| CoreError::resource_exhausted(capacity))?;
        slots.resize_with(capacity, || None);
        Ok(Self { slots, len: 0 })
    }

    /// Returns the number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no key is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Looks up the committed value for `key`.
    ///
    /// The returned reference borrows the table, so it cannot outlive the next
    /// mutation.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        match self.probe(key, hash_str(key)) {
            Probe::Occupied(index) => self.slots[index].as_ref().map(|entry| &entry.value),
            Probe::Vacant(_) | Probe::Exhausted => None,
        }
    }

    /// Returns true if `key` is stored.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Inserts or overwrites `key`.
    ///
    /// Callers must leave at least one empty slot; the commit path sizes the
    /// table before inserting so this always holds there.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CapacityOverflow`] if the key is new and the table
    /// has no empty slot left.
    pub fn insert(&mut self, key: &'k str, value: V) -> CoreResult<InsertOutcome> {
        self.insert_hashed(key, hash_str(key), value)
    }

    /// Inserts with a precomputed hash. Used when rehashing, where the cached
    /// hash is already known.
    fn insert_hashed(&mut self, key: &'k str, hash: u64, value: V) -> CoreResult<InsertOutcome> {
        match self.probe(key, hash) {
            Probe::Occupied(index) => {
                if let Some(entry) = self.slots[index].as_mut() {
                    entry.hash = hash;
                    entry.value = value;
                }
                Ok(InsertOutcome::Updated)
            }
            Probe::Vacant(index) => {
                self.slots[index] = Some(Entry { key, hash, value });
                self.len += 1;
                Ok(InsertOutcome::Inserted)
            }
            Probe::Exhausted => Err(CoreError::capacity_overflow(self.len + 1)),
        }
    }

    /// Re-inserts every entry of this table into `target`, keeping values.
    ///
    /// # Errors
    ///
    /// Fails only if `target` runs out of empty slots.
    pub fn rehash_into(&self, target: &mut Self) -> CoreResult<()> {
        for entry in self.slots.iter().flatten() {
            target.insert_hashed(entry.key, entry.hash, entry.value)?;
        }
        Ok(())
    }

    #[cfg(test)]
    fn entries(&self) -> impl Iterator<Item = (&'k str, V)> + '_ {
        self.slots
            .iter()
            .flatten()
            .map(|entry| (entry.key, entry.value))
    }

    fn probe(&self, key: &str, hash: u64) -> Probe {
        let capacity = self.slots.len();
        if capacity == 0 {
            return Probe::Exhausted;
        }

        let start = (hash % capacity as u64) as usize;
        let mut index = start;
        loop {
            match &self.slots[index] {
                None => return Probe::Vacant(index),
                Some(entry) if entry.hash == hash && entry.key == key => {
                    return Probe::Occupied(index)
                }
                Some(_) => {}
            }
            index = (index + 1) % capacity;
            if index == start {
                return Probe::Exhausted;
            }
        }
    }
}
