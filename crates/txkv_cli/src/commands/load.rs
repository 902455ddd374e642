//! Load command implementation.

use serde::Serialize;
use std::time::Instant;
use tracing::info;
use txkv_core::{Config, Database, StatsSnapshot};

/// Load run report.
#[derive(Debug, Serialize)]
pub struct LoadReport {
    /// Number of keys written.
    pub keys: usize,
    /// Writes per transaction.
    pub batch_size: usize,
    /// Transactions committed.
    pub transactions: usize,
    /// Keys that read back with the wrong value.
    pub mismatches: usize,
    /// Load factor bound the table grows at, in percent.
    pub max_load_percent: u8,
    /// Committed table capacity before loading.
    pub initial_capacity: usize,
    /// Committed table capacity after loading.
    pub final_capacity: usize,
    /// Elapsed wall time in milliseconds.
    pub elapsed_ms: u128,
    /// Database counters.
    pub stats: StatsReport,
}

/// Serializable copy of the database counters.
#[derive(Debug, Serialize)]
pub struct StatsReport {
    /// Total reads.
    pub reads: u64,
    /// Reads that found a value.
    pub read_hits: u64,
    /// Total buffered writes.
    pub writes: u64,
    /// Transactions committed.
    pub transactions_committed: u64,
    /// Commits that grew the table.
    pub table_growths: u64,
    /// Failed operations.
    pub errors: u64,
}

impl From<StatsSnapshot> for StatsReport {
    fn from(stats: StatsSnapshot) -> Self {
        Self {
            reads: stats.reads,
            read_hits: stats.read_hits,
            writes: stats.writes,
            transactions_committed: stats.transactions_committed,
            table_growths: stats.table_growths,
            errors: stats.errors,
        }
    }
}

fn load_value(index: usize) -> i32 {
    (index as i32).wrapping_mul(31)
}

/// Writes `keys` generated keys in batches and reads every one back.
fn load(
    keys: usize,
    batch_size: usize,
    initial_capacity: usize,
) -> Result<LoadReport, Box<dyn std::error::Error>> {
    let batch_size = batch_size.max(1);
    let names: Vec<String> = (0..keys).map(|i| format!("key-{i:08}")).collect();
    let config = Config::default().initial_table_capacity(initial_capacity);
    let mut db = Database::with_config(config)?;
    let start_capacity = db.capacity();

    let start = Instant::now();
    let mut transactions = 0;
    for (batch_index, batch) in names.chunks(batch_size).enumerate() {
        db.transaction(|db| {
            for (offset, name) in batch.iter().enumerate() {
                db.put(name, load_value(batch_index * batch_size + offset))?;
            }
            Ok(())
        })?;
        transactions += 1;
    }

    info!(
        keys,
        transactions,
        capacity = db.capacity(),
        "load committed"
    );

    let mismatches = names
        .iter()
        .enumerate()
        .filter(|(index, name)| db.get(name).copied() != Some(load_value(*index)))
        .count();

    Ok(LoadReport {
        keys,
        batch_size,
        transactions,
        mismatches,
        max_load_percent: db.config().max_load_percent,
        initial_capacity: start_capacity,
        final_capacity: db.capacity(),
        elapsed_ms: start.elapsed().as_millis(),
        stats: db.stats().snapshot().into(),
    })
}

/// Runs the load command.
pub fn run(
    keys: usize,
    batch_size: usize,
    initial_capacity: usize,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = load(keys, batch_size, initial_capacity)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => print_text(&report),
    }

    if report.mismatches == 0 {
        Ok(())
    } else {
        Err(format!("{} keys failed verification", report.mismatches).into())
    }
}

fn print_text(report: &LoadReport) {
    println!("Loaded {} keys in {} transactions", report.keys, report.transactions);
    println!("  Batch size:       {}", report.batch_size);
    println!(
        "  Capacity:         {} -> {}",
        report.initial_capacity, report.final_capacity
    );
    println!("  Max load:         {}%", report.max_load_percent);
    println!("  Table growths:    {}", report.stats.table_growths);
    println!("  Writes:           {}", report.stats.writes);
    println!(
        "  Reads:            {} ({} hits)",
        report.stats.reads, report.stats.read_hits
    );
    println!("  Errors:           {}", report.stats.errors);
    println!("  Elapsed:          {} ms", report.elapsed_ms);
    println!();
    if report.mismatches == 0 {
        println!("✓ All keys verified");
    } else {
        println!("✗ {} keys failed verification", report.mismatches);
    }
}
