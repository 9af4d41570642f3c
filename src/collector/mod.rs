//! Value Collector subsystem for mibin
//!
//! Fills the dynamic sections of a value document from a `ValueSource`,
//! enforcing per-field constraints with a bounded retry budget, then forces
//! reserved fields to their fill values in a separate pass.
//!
//! # Invariants
//!
//! - At most `max_retries` requests per field
//! - Exhausted retries or a cancellation abort the whole fill
//! - No default is ever substituted for a missing value
//! - Audit trail writes are best-effort

mod collector;
mod errors;
mod reserved;
mod source;

pub use collector::{validate, CollectionSummary, Collector};
pub use errors::{CollectError, CollectResult, ValidationError};
pub use reserved::normalize_reserved;
pub use source::{ConsoleSource, FieldKind, FieldRequest, Response, ScriptedSource, ValueSource};
