//! Stress tests for txkv.
//!
//! These helpers drive a database with many small or large transactions and
//! report throughput. Keys come from a [`KeySet`] that outlives the database.

use crate::fixtures::KeySet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use txkv_core::{Database, SharedDatabase};

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Total operations performed.
    pub total_ops: usize,
    /// Successful operations.
    pub successful_ops: usize,
    /// Failed operations.
    pub failed_ops: usize,
    /// Total duration.
    pub duration: Duration,
    /// Operations per second.
    pub ops_per_second: f64,
}

impl StressTestResult {
    /// Creates a new result.
    pub fn new(successful: usize, failed: usize, duration: Duration) -> Self {
        let total = successful + failed;
        let ops_per_second = if duration.as_secs_f64() > 0.0 {
            total as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        Self {
            total_ops: total,
            successful_ops: successful,
            failed_ops: failed,
            duration,
            ops_per_second,
        }
    }
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Number of operations to perform.
    pub operations: usize,
    /// Number of concurrent threads (for concurrent tests).
    pub threads: usize,
    /// Writes per transaction (for batch tests).
    pub batch_size: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            operations: 10_000,
            threads: 4,
            batch_size: 100,
        }
    }
}

/// Run a sequential write stress test: one single-write transaction per
/// operation, cycling through `keys`.
pub fn stress_sequential_writes<'k>(
    db: &mut Database<'k>,
    keys: &'k KeySet,
    config: &StressConfig,
) -> StressTestResult {
    let start = Instant::now();
    let mut successful = 0usize;
    let mut failed = 0usize;

    for i in 0..config.operations {
        let key = keys.key(i % keys.len());
        match db.transaction(|db| db.put(key, i as i32)) {
            Ok(()) => successful += 1,
            Err(_) => failed += 1,
        }
    }

    StressTestResult::new(successful, failed, start.elapsed())
}

/// Run a sequential read stress test against whatever `db` holds.
///
/// Every lookup counts as successful; a miss is still a completed read.
pub fn stress_sequential_reads(
    db: &Database<'_>,
    keys: &KeySet,
    config: &StressConfig,
) -> StressTestResult {
    let start = Instant::now();

    for i in 0..config.operations {
        let _ = db.get(keys.key(i % keys.len()));
    }

    StressTestResult::new(config.operations, 0, start.elapsed())
}

/// Run a batch stress test: `operations / batch_size` transactions, each
/// writing `batch_size` distinct keys. Exercises table growth at commit.
pub fn stress_large_transactions<'k>(
    db: &mut Database<'k>,
    keys: &'k KeySet,
    config: &StressConfig,
) -> StressTestResult {
    let batch_size = config.batch_size.max(1);
    let start = Instant::now();
    let mut successful = 0usize;
    let mut failed = 0usize;

    for batch in 0..(config.operations / batch_size) {
        let result = db.transaction(|db| {
            for i in 0..batch_size {
                let index = (batch * batch_size + i) % keys.len();
                db.put(keys.key(index), index as i32)?;
            }
            Ok(())
        });

        match result {
            Ok(()) => successful += batch_size,
            Err(_) => failed += batch_size,
        }
    }

    StressTestResult::new(successful, failed, start.elapsed())
}

/// Run a rollback stress test: every other transaction is rolled back after
/// buffering a write. Rolled-back transactions count as failed.
pub fn stress_rollbacks<'k>(
    db: &mut Database<'k>,
    keys: &'k KeySet,
    config: &StressConfig,
) -> StressTestResult {
    let start = Instant::now();
    let mut successful = 0usize;
    let mut failed = 0usize;

    for i in 0..config.operations {
        let key = keys.key(i % keys.len());
        match write_then_finish(db, key, i as i32, i % 2 == 1) {
            Ok(true) => successful += 1,
            Ok(false) | Err(_) => failed += 1,
        }
    }

    StressTestResult::new(successful, failed, start.elapsed())
}

fn write_then_finish<'k>(
    db: &mut Database<'k>,
    key: &'k str,
    value: i32,
    commit: bool,
) -> txkv_core::CoreResult<bool> {
    db.begin()?;
    db.put(key, value)?;
    if commit {
        db.commit()?;
    } else {
        db.rollback()?;
    }
    Ok(commit)
}

/// Run a concurrent increment stress test. Each thread performs its share of
/// read-modify-write transactions on `keys`.
pub fn stress_concurrent_increments<'k>(
    db: &SharedDatabase<'k>,
    keys: &'k KeySet,
    config: &StressConfig,
) -> StressTestResult {
    let successful = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);
    let threads = config.threads.max(1);
    let ops_per_thread = config.operations / threads;

    let start = Instant::now();

    thread::scope(|scope| {
        for t in 0..threads {
            let successful = &successful;
            let failed = &failed;
            scope.spawn(move || {
                for i in 0..ops_per_thread {
                    let key = keys.key((t * ops_per_thread + i) % keys.len());
                    let result = db.transaction(|db| {
                        let current = db.get(key).copied().unwrap_or(0);
                        db.put(key, current + 1)
                    });
                    match result {
                        Ok(()) => successful.fetch_add(1, Ordering::Relaxed),
                        Err(_) => failed.fetch_add(1, Ordering::Relaxed),
                    };
                }
            });
        }
    });

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}
