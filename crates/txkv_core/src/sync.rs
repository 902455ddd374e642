//! Thread-safe access to a database.
//!
//! `Database` assumes a single logical writer. `SharedDatabase` puts the
//! whole instance behind one mutex so that every operation, and every
//! closure-scoped transaction, is a single critical section.

use crate::database::Database;
use crate::error::CoreResult;
use crate::stats::StatsSnapshot;
use parking_lot::{Mutex, MutexGuard};

/// A database guarded by a mutex.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::thread;
/// use txkv_core::{Database, SharedDatabase};
///
/// let shared = Arc::new(SharedDatabase::new(Database::new()));
/// let worker = Arc::clone(&shared);
/// thread::spawn(move || worker.transaction(|db| db.put("hits", 1)))
///     .join()
///     .unwrap()
///     .unwrap();
/// assert_eq!(shared.get("hits"), Some(1));
/// ```
#[derive(Debug)]
pub struct SharedDatabase<'k, V = i32> {
    inner: Mutex<Database<'k, V>>,
}

impl<'k, V: Copy> Default for SharedDatabase<'k, V> {
    fn default() -> Self {
        Self::new(Database::new())
    }
}

impl<'k, V: Copy> SharedDatabase<'k, V> {
    /// Wraps a database.
    #[must_use]
    pub fn new(db: Database<'k, V>) -> Self {
        Self {
            inner: Mutex::new(db),
        }
    }

    /// Returns a copy of the committed value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<V> {
        self.inner.lock().get(key).copied()
    }

    /// Runs `f` inside a transaction while holding the lock.
    ///
    /// # Errors
    ///
    /// See [`Database::transaction`].
    pub fn transaction<F, T>(&self, f: F) -> CoreResult<T>
    where
        F: FnOnce(&mut Database<'k, V>) -> CoreResult<T>,
    {
        self.inner.lock().transaction(f)
    }

    /// Returns a snapshot of the database counters.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.inner.lock().stats().snapshot()
    }

    /// Locks the database for a sequence of calls.
    pub fn lock(&self) -> MutexGuard<'_, Database<'k, V>> {
        self.inner.lock()
    }

    /// Unwraps the database.
    #[must_use]
    pub fn into_inner(self) -> Database<'k, V> {
        self.inner.into_inner()
    }
}
