//! CLI argument definitions using clap
//!
//! Commands:
//! - mibin generate --ini <path> --config <csv>
//! - mibin pack --ini <path> --config <csv> --out <path>
//! - mibin inspect <bin>

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// mibin - schema-driven binary record generator
#[derive(Parser, Debug)]
#[command(name = "mibin")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub verbosity: Verbosity,

    #[command(subcommand)]
    pub command: Command,
}

/// Log threshold flags
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct Verbosity {
    /// Log every packed field (long form only; -V prints the version)
    #[arg(long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Prompt for the dynamic values, then build and checksum the artifact
    Generate {
        /// Value document template (INI)
        #[arg(long)]
        ini: PathBuf,

        /// Schema source (CSV rows of name,type,size)
        #[arg(long)]
        config: PathBuf,

        /// Optional JSON settings file
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Root directory for date-stamped output folders
        #[arg(long)]
        output_root: Option<PathBuf>,

        /// Answer file, one value per line, instead of the console
        #[arg(long)]
        answers: Option<PathBuf>,
    },

    /// Build an artifact from an already resolved value document
    Pack {
        /// Resolved value document (INI)
        #[arg(long)]
        ini: PathBuf,

        /// Schema source (CSV rows of name,type,size)
        #[arg(long)]
        config: PathBuf,

        /// Artifact path to write
        #[arg(long)]
        out: PathBuf,

        /// Optional JSON settings file
        #[arg(long)]
        settings: Option<PathBuf>,
    },

    /// Hex dump an artifact and verify its checksum trailer
    Inspect {
        /// Artifact to inspect
        bin: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
