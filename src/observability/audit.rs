//! Operator audit trail
//!
//! A plain-text, append-only record of selected collected values:
//! - Each value is followed by its section's terminator (tab or newline)
//! - The file is opened, appended and closed on every write
//! - Writes are best-effort; callers log failures and carry on
//!
//! One trail file per day: `<YYYYMMDD>.txt` inside the day's output folder.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What follows an audited value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditTerminator {
    /// `\t`, more values follow on the same line
    Tab,
    /// `\n`, closes the line
    Newline,
}

impl AuditTerminator {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditTerminator::Tab => "\t",
            AuditTerminator::Newline => "\n",
        }
    }
}

/// Sink for audited values.
pub trait AuditTrail {
    /// Append one value followed by its terminator.
    fn record(&self, value: &str, terminator: AuditTerminator) -> io::Result<()>;
}

/// Audit trail backed by a file, reopened for every write.
#[derive(Debug, Clone)]
pub struct FileAuditTrail {
    path: PathBuf,
}

impl FileAuditTrail {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Trail for `date` inside `dir`.
    pub fn daily(dir: &Path, date: NaiveDate) -> Self {
        Self::new(dir.join(format!("{}.txt", date.format("%Y%m%d"))))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditTrail for FileAuditTrail {
    fn record(&self, value: &str, terminator: AuditTerminator) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        // Single write so a value and its terminator are never split
        file.write_all(format!("{}{}", value, terminator.as_str()).as_bytes())
    }
}

/// In-memory audit trail for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryAuditTrail {
    contents: Mutex<String>,
}

impl MemoryAuditTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    pub fn contents(&self) -> String {
        self.contents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl AuditTrail for MemoryAuditTrail {
    fn record(&self, value: &str, terminator: AuditTerminator) -> io::Result<()> {
        let mut contents = self
            .contents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        contents.push_str(value);
        contents.push_str(terminator.as_str());
        Ok(())
    }
}
