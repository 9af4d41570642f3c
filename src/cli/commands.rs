//! CLI command implementations
//!
//! Each command loads its own inputs, runs one pipeline entry point and
//! reports the artifact it produced. Nothing is shared between commands.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::collector::{ConsoleSource, ScriptedSource, ValueSource};
use crate::config::Settings;
use crate::finalizer::{verify_artifact, TRAILER_LEN};
use crate::generator::{self, GenerateRequest};
use crate::observability::{log_event_with_fields, Event, Logger, Severity};

use super::args::{Cli, Command, Verbosity};
use super::errors::CliResult;

const DUMP_WIDTH: usize = 16;

/// Main entry point for CLI
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    apply_verbosity(cli.verbosity);
    run_command(cli.command)
}

/// Execute a CLI command
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Generate {
            ini,
            config,
            settings,
            output_root,
            answers,
        } => generate(&ini, &config, settings.as_deref(), output_root, answers.as_deref()),
        Command::Pack {
            ini,
            config,
            out,
            settings,
        } => pack(&ini, &config, &out, settings.as_deref()),
        Command::Inspect { bin } => inspect(&bin),
    }
}

fn apply_verbosity(verbosity: Verbosity) {
    if verbosity.verbose {
        Logger::set_threshold(Severity::Trace);
    } else if verbosity.quiet {
        Logger::set_threshold(Severity::Warn);
    }
}

/// Collect the dynamic values, then build the artifact
pub fn generate(
    ini: &Path,
    schema: &Path,
    settings_path: Option<&Path>,
    output_root: Option<PathBuf>,
    answers: Option<&Path>,
) -> CliResult<()> {
    let mut settings = load_settings(settings_path)?;
    if let Some(root) = output_root {
        settings.output_root = root;
    }

    let request = GenerateRequest::new(ini, schema, settings);
    let mut source: Box<dyn ValueSource> = match answers {
        Some(path) => Box::new(ScriptedSource::from_file(path)?),
        None => Box::new(ConsoleSource::stdio()),
    };

    let outcome = generator::generate(&request, source.as_mut())?;

    let mut out = io::stdout().lock();
    writeln!(out, "Modified document: {}", outcome.modified_document_path.display())?;
    writeln!(out, "Audit trail: {}", outcome.audit_path.display())?;
    writeln!(
        out,
        "Artifact: {} ({} bytes, crc32 {:08x})",
        outcome.artifact_path.display(),
        outcome.finalized.final_len,
        outcome.finalized.crc32
    )?;
    Ok(())
}

/// Build an artifact from a resolved document without prompting
pub fn pack(ini: &Path, schema: &Path, out_path: &Path, settings_path: Option<&Path>) -> CliResult<()> {
    let settings = load_settings(settings_path)?;
    let outcome = generator::pack(ini, schema, out_path, &settings)?;

    let mut out = io::stdout().lock();
    writeln!(
        out,
        "Artifact: {} ({} bytes, crc32 {:08x})",
        outcome.artifact_path.display(),
        outcome.finalized.final_len,
        outcome.finalized.crc32
    )?;
    Ok(())
}

/// Print a hex dump of an artifact and the result of verifying its trailer
pub fn inspect(path: &Path) -> CliResult<()> {
    let bytes = fs::read(path)?;

    let mut out = io::stdout().lock();
    out.write_all(hex_dump(&bytes).as_bytes())?;

    let verification = verify_artifact(path)?;
    writeln!(
        out,
        "Body {} bytes + {} byte trailer, crc32 {:08x} OK",
        verification.body_len, TRAILER_LEN, verification.crc32
    )?;
    Ok(())
}

fn load_settings(path: Option<&Path>) -> CliResult<Settings> {
    let settings = Settings::load_or_default(path)?;
    let source = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    log_event_with_fields(Event::SettingsLoaded, &[("source", source.as_str())]);
    Ok(settings)
}

/// Offset, 16 hex bytes and printable ASCII per line.
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut dump = String::new();
    for (row, chunk) in bytes.chunks(DUMP_WIDTH).enumerate() {
        dump.push_str(&format!("{:08x} ", row * DUMP_WIDTH));
        for i in 0..DUMP_WIDTH {
            if i == DUMP_WIDTH / 2 {
                dump.push(' ');
            }
            match chunk.get(i) {
                Some(b) => dump.push_str(&format!(" {:02x}", b)),
                None => dump.push_str("   "),
            }
        }
        dump.push_str("  |");
        dump.extend(chunk.iter().map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        }));
        dump.push_str("|\n");
    }
    dump
}
