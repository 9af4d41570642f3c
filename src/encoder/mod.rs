//! Field Encoder subsystem for mibin
//!
//! Converts one raw string value into its wire bytes given the field's
//! schema type and declared size. Pure: no I/O, no shared state.

mod errors;
mod field;
mod literal;

pub use errors::{EncodeError, EncodeErrorCode, EncodeResult};
pub use field::{decode_scalar, encode, Encoded};
pub use literal::parse_integer;
