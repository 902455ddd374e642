//! txkv CLI
//!
//! Command-line tools for exercising the txkv store.
//!
//! # Commands
//!
//! - `demo` - Run the scripted transaction scenario and check every step
//! - `load` - Commit generated keys in batches and verify them
//! - `version` - Show version information

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// txkv command-line tools.
#[derive(Parser)]
#[command(name = "txkv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scripted scenario, printing expected and actual outcomes
    Demo,

    /// Commit generated keys in batches, then verify and report
    Load {
        /// Number of distinct keys to write
        #[arg(short, long, default_value = "10000")]
        keys: usize,

        /// Writes per transaction
        #[arg(short, long, default_value = "100")]
        batch: usize,

        /// Initial committed table capacity
        #[arg(long, default_value = "16")]
        initial_capacity: usize,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Demo => commands::demo::run()?,
        Commands::Load {
            keys,
            batch,
            initial_capacity,
            format,
        } => commands::load::run(keys, batch, initial_capacity, &format)?,
        Commands::Version => {
            println!("txkv CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("txkv core v{}", txkv_core::VERSION);
        }
    }

    Ok(())
}
