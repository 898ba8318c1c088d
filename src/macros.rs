//! Utility macros for building input trees.
//!
//! - `MK_TOKEN!` - Creates a Token instance, optionally positioned
//! - `MK_POSITION!` - Creates a Position in a named source file
//!
//! Front ends and tests use these to hand leaves over to the analyzer.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$category` - The TokenCategory
/// * `$lexeme` - The token's source text
/// * `$position` - The source position (optional)
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenCategory::Num, "42", MK_POSITION!(7, "main.kobe"));
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($category:expr, $lexeme:expr) => {
        $crate::ast::tokens::Token::new($category, $lexeme)
    };
    ($category:expr, $lexeme:expr, $position:expr) => {
        $crate::ast::tokens::Token::new($category, $lexeme).at($position)
    };
}

/// Creates a Position from a byte offset and a file name.
///
/// # Example
///
/// ```ignore
/// let position = MK_POSITION!(12, "main.kobe");
/// ```
#[macro_export]
macro_rules! MK_POSITION {
    ($offset:expr, $file:expr) => {
        $crate::Position($offset, std::rc::Rc::new(String::from($file)))
    };
}
