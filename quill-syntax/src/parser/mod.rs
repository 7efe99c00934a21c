//! Parsing: turns source text into a raw (not yet normalized) [`Node`](crate::ast::Node) tree.

mod date;
mod error;
mod grammar;
mod keyword;
mod lexer;
mod number;
mod string;

pub use error::{ParseError, SyntaxError};

use crate::ast::Node;

/// Parses `source` into a raw [`Node::Entry`], without running the
/// normalizing transformer. [`crate::parse_to_ast`] is the usual entry
/// point; this is exposed for tests that want to inspect the pre-normalized
/// tree.
pub fn parse(source: &str) -> error::Result<Node> {
    grammar::Parser::new(source).parse_entry()
}
