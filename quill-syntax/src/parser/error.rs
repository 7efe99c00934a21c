//! Errors produced while scanning or parsing source text

use crate::source::Location;
use std::fmt;
use thiserror::Error;

/// Causes of a [`ParseError`], kept separate from the formatted message so
/// tests can match on the failure kind without string comparison.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SyntaxError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
    #[error("invalid escape sequence")]
    InvalidEscape,
    #[error("invalid numeric literal {0:?}")]
    InvalidNumber(String),
    #[error("invalid date literal {0:?}")]
    InvalidDate(String),
    #[error("unterminated quoted string")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedBlockComment,
    #[error("reserved word {0:?} cannot be used as an identifier")]
    ReservedWordAsIdentifier(String),
    #[error("expecting {0}")]
    Expecting(String),
}

/// A single grammar mismatch, reported with the location at which the
/// parser gave up.
///
/// The grammar has no error recovery (spec.md §4.1): on the first mismatch
/// the parser aborts and returns this error directly to the caller of
/// [`parse_to_ast`](crate::parse_to_ast).
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("{location}: {cause}")]
pub struct ParseError {
    pub cause: SyntaxError,
    pub location: Location,
}

impl ParseError {
    pub(crate) fn new(location: Location, cause: SyntaxError) -> Self {
        ParseError { cause, location }
    }

    pub(crate) fn expecting(location: Location, what: impl fmt::Display) -> Self {
        ParseError::new(location, SyntaxError::Expecting(what.to_string()))
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;
