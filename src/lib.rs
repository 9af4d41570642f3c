//! mibin - A strict, schema-driven generator for checksummed binary records
//!
//! Collect -> assemble -> finalize, one sequential pass per artifact.

pub mod assembler;
pub mod cli;
pub mod collector;
pub mod config;
pub mod document;
pub mod encoder;
pub mod finalizer;
pub mod generator;
pub mod observability;
pub mod schema;
