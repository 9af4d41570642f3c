//! Stage scopes with automatic begin/complete logging
//!
//! - `{NAME}_BEGIN` on creation
//! - `{NAME}_COMPLETE` on `complete()`, with elapsed milliseconds
//! - `{NAME}_ERROR` on `fail()` or when dropped without either

use std::time::Instant;

use super::logger::Logger;

/// A pipeline stage being observed.
///
/// ```ignore
/// let scope = StageScope::new("ASSEMBLY");
/// let report = assemble(&doc, &registry, &mut sink)?; // early return logs ASSEMBLY_ERROR
/// scope.complete(&[("fields", &report.field_count.to_string())]);
/// ```
pub struct StageScope {
    name: &'static str,
    started: Instant,
    finished: bool,
}

impl StageScope {
    /// Opens a scope, logging `{name}_BEGIN`.
    pub fn new(name: &'static str) -> Self {
        Self::with_fields(name, &[])
    }

    /// Opens a scope with fields on the begin event.
    pub fn with_fields(name: &'static str, fields: &[(&str, &str)]) -> Self {
        Logger::info(&format!("{}_BEGIN", name), fields);
        Self {
            name,
            started: Instant::now(),
            finished: false,
        }
    }

    /// Closes the scope successfully.
    pub fn complete(mut self, fields: &[(&str, &str)]) {
        self.finished = true;
        let elapsed = self.elapsed_ms();
        let mut all: Vec<(&str, &str)> = fields.to_vec();
        all.push(("elapsed_ms", &elapsed));
        Logger::info(&format!("{}_COMPLETE", self.name), &all);
    }

    /// Closes the scope with an explicit failure reason.
    pub fn fail(mut self, reason: &str) {
        self.finished = true;
        Logger::error(&format!("{}_ERROR", self.name), &[("reason", reason)]);
    }

    /// Stage name
    pub fn name(&self) -> &'static str {
        self.name
    }

    fn elapsed_ms(&self) -> String {
        self.started.elapsed().as_millis().to_string()
    }
}

impl Drop for StageScope {
    fn drop(&mut self) {
        if !self.finished {
            Logger::error(
                &format!("{}_ERROR", self.name),
                &[("reason", "stage exited early")],
            );
        }
    }
}
