//! Value documents for mibin
//!
//! A value document is an ordered list of sections, each an ordered list of
//! `field = raw value` entries. The collector fills it in, persists a
//! resolved copy, and the assembler packs that copy field by field.

mod errors;
mod types;
pub mod ini;

pub use errors::{DocumentError, DocumentResult};
pub use ini::{WARNING_COMMENT, WARNING_SECTION};
pub use types::{Section, ValueDocument};
