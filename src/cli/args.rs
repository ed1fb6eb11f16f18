//! CLI argument definitions using clap
//!
//! Commands:
//! - selection-ledger write [--config <path>] [--store <path>]
//! - selection-ledger inspect [--config <path>] [--store <path>]
//! - selection-ledger verify [--config <path>] [--store <path>]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// selection-ledger - persisted selection reasons for resolved dependency graphs
#[derive(Parser, Debug)]
#[command(name = "selection-ledger")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Result file, overriding `store_path` from the configuration
    #[arg(long)]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read a resolved graph as JSON from stdin and persist it
    Write {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Print a persisted result as JSON
    Inspect {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Check a persisted result and print summary counters
    Verify {
        #[command(flatten)]
        common: CommonArgs,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
