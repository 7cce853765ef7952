//! Reader module: parsing serialized markup fragments into annotation trees.
//!
//! The merge core consumes in-memory trees; the CLI and the test suite get
//! theirs from serialized markup. This module provides that bridge in two
//! stages, mirroring the lexer/parser split used everywhere else in the
//! crate's lineage:
//!
//! 1. Raw tokenization with a logos lexer ([`lexer`]) — tags, character
//!    entities, and text runs.
//! 2. A recursive-descent pass ([`parser`]) that classifies tags, decodes
//!    entities, and builds the [`Element`](crate::tree::Element) tree.
//!
//! The reader accepts well-formed fragments only: every non-void tag must be
//! closed, closes must match their opens, and a bare `<` in text position is
//! rejected (text is expected to be entity-escaped, as the merger itself
//! emits it).

pub mod lexer;
pub mod parser;

pub use lexer::{tokenize, Token};
pub use parser::parse_markup;

use std::fmt;

/// Errors produced while reading a markup fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Input that tokenizes to nothing valid, typically an unescaped `<`.
    InvalidToken { at: usize },
    /// A tag whose inside could not be classified (missing name, stray
    /// punctuation).
    BadTag { raw: String, at: usize },
    /// A closing tag with no element open.
    UnexpectedClose { name: String, at: usize },
    /// A closing tag that does not match the innermost open element.
    MismatchedClose {
        expected: String,
        found: String,
        at: usize,
    },
    /// A closing tag for a void element, which never closes.
    CloseForVoidTag { name: String, at: usize },
    /// A non-void element still open at the end of input.
    UnclosedTag { name: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidToken { at } => {
                write!(f, "invalid markup at byte {} (unescaped '<'?)", at)
            }
            ParseError::BadTag { raw, at } => {
                write!(f, "unparseable tag {} at byte {}", raw, at)
            }
            ParseError::UnexpectedClose { name, at } => {
                write!(f, "closing tag </{}> at byte {} with nothing open", name, at)
            }
            ParseError::MismatchedClose {
                expected,
                found,
                at,
            } => write!(
                f,
                "closing tag </{}> at byte {} does not match open <{}>",
                found, at, expected
            ),
            ParseError::CloseForVoidTag { name, at } => {
                write!(f, "void tag <{}> cannot be closed (byte {})", name, at)
            }
            ParseError::UnclosedTag { name } => {
                write!(f, "<{}> is never closed", name)
            }
        }
    }
}

impl std::error::Error for ParseError {}
