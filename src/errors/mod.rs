//! Error types and error handling for the middle end.
//!
//! This module defines the errors raised by semantic analysis. It includes:
//!
//! - Error structures with optional source position information
//! - One error variant per violated analysis rule
//! - Error names and suggestions used when rendering diagnostics
//!
//! Analysis is fail-fast, so a run produces at most one of these.

pub mod errors;

#[cfg(test)]
mod tests;
