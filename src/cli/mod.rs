//! CLI module for mibin
//!
//! Provides command-line interface for:
//! - generate: Prompt for dynamic values and build the artifact
//! - pack: Build an artifact from a resolved document
//! - inspect: Hex dump and verify an artifact

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, Verbosity};
pub use commands::{generate, hex_dump, inspect, pack, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
