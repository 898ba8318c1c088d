//! Semantic analysis module.
//!
//! This module checks a parsed [`Program`](crate::ast::ast::Program) and
//! turns it into a [`TypedProgram`](typed_ast::TypedProgram) while:
//!
//! - Resolving every identifier through the scope chain
//! - Converting literal lexemes into native values
//! - Checking operator, assignment, call and output types
//! - Rejecting writes to read-only bindings
//!
//! Analysis stops at the first violation and returns it as an
//! [`Error`](crate::errors::errors::Error).

pub mod analyzer;
pub mod prelude;
pub mod scope;
pub mod typed_ast;
