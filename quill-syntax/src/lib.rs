//! Lexer, grammar, and AST normalization for the Quill scripting language.
//!
//! [`parse_to_ast`] is the single public entry point: it runs the
//! recursive-descent [`parser`] and then the [normalizing
//! transformer](transform::normalize) over the result, handing
//! `quill-semantics` a canonical [`ast::Node::Entry`] to evaluate.

pub mod ast;
pub mod parser;
pub mod source;
pub mod transform;

pub use parser::{ParseError, SyntaxError};

use ast::Node;

/// Parses and normalizes `text`, returning the program's canonical
/// [`Node::Entry`].
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered; the grammar has no error
/// recovery (spec.md §4.1).
pub fn parse_to_ast(text: &str) -> Result<Node, ParseError> {
    let raw = parser::parse(text)?;
    Ok(transform::normalize(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes_a_small_program() {
        let entry = parse_to_ast(
            r#"
            package demo;

            x = 1 + 2 * 3;
            if (x > 0) {
                print(x);
            }
            "#,
        )
        .expect("parse_to_ast should succeed");

        assert_matches::assert_matches!(entry, Node::Entry { .. });
    }

    #[test]
    fn rejects_unterminated_string() {
        let err = parse_to_ast(r#"x = "unterminated;"#).unwrap_err();
        assert_matches::assert_matches!(err.cause, SyntaxError::UnterminatedString);
    }
}
