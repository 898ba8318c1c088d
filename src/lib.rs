#![allow(clippy::module_inception)]

use std::{fmt::Display, rc::Rc};

use crate::{
    analyzer::{analyzer::analyze, typed_ast::TypedProgram},
    ast::ast::Program,
    errors::errors::{Error, ErrorTip},
    optimizer::optimizer::optimize,
};

pub mod analyzer;
pub mod ast;
pub mod errors;
pub mod macros;
pub mod optimizer;

extern crate regex;

/// A byte offset into a named source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Rc<String>);

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.1, self.0)
    }
}

/// Analyzes `program` against the standard prelude, then optimizes it.
#[tracing::instrument(skip_all)]
pub fn compile(program: &Program) -> Result<TypedProgram, Error> {
    let analyzed = analyze(program)?;
    Ok(optimize(analyzed))
}

/// Finds the line holding byte `position` of `source`.
///
/// Returns the 1-based line number, the line text and the offset of
/// `position` inside that line.
pub fn get_line_at_position(source: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    if pos >= source.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            let line_pos = pos - start;
            return Some((line_number, line.to_string(), line_pos));
        }

        start = end;
        line_number += 1;
    }

    None
}

/// Renders `error` as a caret diagnostic against the program text it was
/// raised for.
pub fn render_error(error: &Error, source: &str) -> String {
    /*
        Error: Name (tip)
        -> main.kobe
           |
        20 | num a = true
           | --------^
    */

    let mut rendered = match error.get_tip() {
        ErrorTip::None => format!("Error: {} ({})\n", error.get_error_name(), error.get_internal_error()),
        tip => format!("Error: {} ({})\n", error.get_error_name(), tip),
    };

    let Some(position) = error.get_position() else {
        return rendered;
    };
    rendered.push_str(&format!("-> {}\n", position.1));

    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.0) else {
        return rendered;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    rendered.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    rendered.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim()));

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;
    rendered.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));

    rendered
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}

/// Indents a `{:?}` dump so nested trees can be read. Text inside string
/// literals of the dump is copied unchanged.
pub fn pretty_print(string: String) -> String {
    let mut result = String::new();
    let mut indent: usize = 0;
    let mut ignore_next_space = false;
    let mut in_string = false;
    let mut escaped = false;

    for c in string.chars() {
        if in_string {
            result.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                ignore_next_space = false;
                result.push(c);
            }
            '{' => {
                indent += 1;
                result.push(c);
                result.push('\n');
                result.push_str(&"  ".repeat(indent));
                ignore_next_space = true;
            }
            '(' | '[' => {
                indent += 1;
                result.push(c);
                result.push('\n');
                result.push_str(&"  ".repeat(indent));
            }
            '}' | ')' | ']' => {
                indent = indent.saturating_sub(1);
                result.push('\n');
                result.push_str(&"  ".repeat(indent));
                result.push(c);
            }
            ',' => {
                result.push(c);
                result.push('\n');
                result.push_str(&"  ".repeat(indent));
                ignore_next_space = true;
            }
            ' ' if ignore_next_space => {
                ignore_next_space = false;
            }
            _ => result.push(c),
        }
    }

    result
}
