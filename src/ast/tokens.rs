//! Leaf tokens handed over by the front end.
//!
//! Every identifier, literal and operator in the syntax tree is a [`Token`]:
//! a source category, the raw lexeme, and (when the front end knows it) the
//! position of the lexeme in the source. The analyzer converts lexemes into
//! native values, so this module also owns the lexeme shape checks.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt::Display;

use crate::Position;

lazy_static! {
    static ref IDENTIFIER_PATTERN: Regex = Regex::new(r"^[\p{L}_][\p{L}\p{N}_]*$").unwrap();
    static ref NUMBER_PATTERN: Regex = Regex::new(r"^[0-9]+(\.[0-9]+)?$").unwrap();
    static ref QUOTE_PATTERN: Regex = Regex::new(r#"^"(?s:[^"\\]|\\.)*"$"#).unwrap();
}

/// Source category of a leaf.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenCategory {
    Id,
    Num,
    Baal,
    Quote,
    Sym,
}

impl Display for TokenCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub category: TokenCategory,
    pub lexeme: String,
    pub position: Option<Position>,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},\"{}\")", self.category, self.lexeme)
    }
}

impl Token {
    pub fn new(category: TokenCategory, lexeme: impl Into<String>) -> Self {
        Token {
            category,
            lexeme: lexeme.into(),
            position: None,
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn is_well_formed_identifier(&self) -> bool {
        IDENTIFIER_PATTERN.is_match(&self.lexeme)
    }

    /// Parses a `Num` lexeme. Only plain decimal notation is accepted.
    pub fn number_value(&self) -> Option<f64> {
        if !NUMBER_PATTERN.is_match(&self.lexeme) {
            return None;
        }
        self.lexeme.parse::<f64>().ok()
    }

    pub fn baal_value(&self) -> Option<bool> {
        match self.lexeme.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    /// Strips the surrounding quotes of a `Quote` lexeme and resolves its
    /// escape sequences. `\xHH` names an ASCII character, so HH is 00 to 7F.
    pub fn quote_value(&self) -> Option<String> {
        if self.lexeme.len() < 2 || !QUOTE_PATTERN.is_match(&self.lexeme) {
            return None;
        }
        unescape(&self.lexeme[1..self.lexeme.len() - 1])
    }
}

fn unescape(body: &str) -> Option<String> {
    let mut result = String::new();
    let mut chars = body.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some('0') => result.push('\0'),
            Some('x') => {
                let mut hex = String::new();
                for _ in 0..2 {
                    match chars.peek() {
                        Some(c) if c.is_ascii_hexdigit() => {
                            hex.push(*c);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                let byte = u8::from_str_radix(&hex, 16).ok().filter(u8::is_ascii)?;
                result.push(char::from(byte));
            }
            // Unknown escapes keep their backslash
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    Some(result)
}
