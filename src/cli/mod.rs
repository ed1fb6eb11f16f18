//! CLI module for selection-ledger
//!
//! Provides command-line interface for:
//! - write: Persist a resolved graph read from stdin
//! - inspect: Print a persisted result with derived flags
//! - verify: Check a persisted result and print counters

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, CommonArgs};
pub use commands::{
    inspect, render_loaded, run, run_command, verify, write, ComponentInput, WriteRequest,
};
pub use errors::{CliError, CliResult};
pub use io::{parse_request, read_request, write_error, write_response};
