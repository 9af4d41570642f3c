//! Request/response seam between validation and whatever supplies values
//!
//! The collector issues a `FieldRequest` and blocks until the source answers
//! with a value or a cancellation. Sources know nothing about validation or
//! retry budgets; they are told the outcome through `rejected`.

use std::collections::VecDeque;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use super::errors::ValidationError;

/// Validation rule attached to a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text of at most `max_size` bytes
    Text { max_size: usize },
    /// Decimal integer within `[min, max]`
    Numeric { min: i64, max: i64 },
}

/// "Need a value for this field, under these constraints"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRequest<'a> {
    pub section: &'a str,
    pub field: &'a str,
    pub kind: FieldKind,
    /// Extra format guidance, e.g. `DDMMYYYY`
    pub hint: Option<&'a str>,
    /// 1-based attempt number
    pub attempt: u32,
    pub max_attempts: u32,
}

/// Answer to a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Value(String),
    Cancel,
}

/// Anything that can answer field requests: an operator, a script, a test.
pub trait ValueSource {
    /// Blocks until a value or a cancellation is available.
    fn request(&mut self, request: &FieldRequest<'_>) -> Response;

    /// Told when the previous answer was rejected.
    fn rejected(&mut self, _request: &FieldRequest<'_>, _reason: &ValidationError) {}
}

/// Interactive prompt on a line-oriented reader/writer pair.
///
/// End of input counts as cancellation.
pub struct ConsoleSource<R, W> {
    input: R,
    output: W,
}

impl ConsoleSource<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the process's stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleSource<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn prompt_text(request: &FieldRequest<'_>) -> String {
        match (request.kind, request.hint) {
            (FieldKind::Text { max_size }, Some(hint)) => format!(
                "Enter {} in format[{}]({} byte string): ",
                request.field, hint, max_size
            ),
            (FieldKind::Text { max_size }, None) => {
                format!("Enter {} ({} byte string): ", request.field, max_size)
            }
            (FieldKind::Numeric { min, max }, _) => {
                format!("Enter {} ({} to {}): ", request.field, min, max)
            }
        }
    }
}

impl<R: BufRead, W: Write> ValueSource for ConsoleSource<R, W> {
    fn request(&mut self, request: &FieldRequest<'_>) -> Response {
        let prompt = Self::prompt_text(request);
        if self.output.write_all(prompt.as_bytes()).is_err() || self.output.flush().is_err() {
            return Response::Cancel;
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => Response::Cancel,
            Ok(_) => Response::Value(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }

    fn rejected(&mut self, request: &FieldRequest<'_>, reason: &ValidationError) {
        let remaining = request.max_attempts.saturating_sub(request.attempt);
        let _ = writeln!(
            self.output,
            "[Error] - {} ({} attempts left)",
            reason, remaining
        );
    }
}

/// Pre-recorded answers, served in order. Runs dry into cancellation.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    answers: VecDeque<Response>,
    served: usize,
    rejections: usize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue plain values.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: values.into_iter().map(|v| Response::Value(v.into())).collect(),
            ..Self::default()
        }
    }

    /// One answer per line of a text file.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_values(
            content.lines().map(|line| line.trim_end_matches('\r').to_string()),
        ))
    }

    /// Queue an explicit response, e.g. a cancellation.
    pub fn push(&mut self, response: Response) {
        self.answers.push_back(response);
    }

    /// Number of requests answered so far.
    pub fn served(&self) -> usize {
        self.served
    }

    /// Number of answers rejected by validation.
    pub fn rejections(&self) -> usize {
        self.rejections
    }

    /// Answers not yet consumed.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl ValueSource for ScriptedSource {
    fn request(&mut self, _request: &FieldRequest<'_>) -> Response {
        self.served += 1;
        self.answers.pop_front().unwrap_or(Response::Cancel)
    }

    fn rejected(&mut self, _request: &FieldRequest<'_>, _reason: &ValidationError) {
        self.rejections += 1;
    }
}
