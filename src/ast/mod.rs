/// AST (Abstract Syntax Tree) module
/// Contains the syntax tree handed over by the front end
///
/// Submodules:
/// - ast: Statements, expressions, operators and tree constructors
/// - tokens: Leaf tokens and lexeme conversion
/// - types: The Kobe type system
pub mod ast;
pub mod tokens;
pub mod types;
