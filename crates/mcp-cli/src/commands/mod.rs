//! Command implementations for the MCP CLI.
//!
//! Each command module parses its arguments into library types, runs the
//! pipeline stage it owns and formats its report according to the requested
//! output format.

pub mod common;
pub mod convert;
pub mod introspect;
