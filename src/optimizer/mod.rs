//! Optimizer for analyzed programs.
//!
//! Rewrites a [`TypedProgram`](crate::analyzer::typed_ast::TypedProgram)
//! bottom-up: children are optimized before their parent's rule is tried.
//! The rewrites are constant folding, algebraic identities, boolean
//! simplification and removal of statements that can never run or have no
//! effect. Calls are kept in place and in order.
//!
//! The pass cannot fail and reaches a fixed point in one run, so optimizing
//! its own output changes nothing.

pub mod optimizer;

#[cfg(test)]
mod tests;
