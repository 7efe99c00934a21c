//! Numeric literal scanning
//!
//! Two literal shapes share a single scan: `123` (`Int64`, widening to
//! `UInt64` only when the magnitude overflows `i64`) and `1.5` (`Double`,
//! which requires a decimal point). There is no surface suffix for
//! `UInt64` — spec.md §4.1/§6 describe it as "the parser decides widest",
//! matching `numbers_def = strict_double | int64 | uint64` in
//! `original_source/src/expressions/parser/grammar_def.hpp`, which picks
//! `uint64` by magnitude when `int64` overflows rather than by any written
//! marker. Leading zeroes are rejected except for the bare literal `0`
//! (and `0.x` doubles, where the leading digit is not itself the whole
//! integer part).

use super::error::{Result, SyntaxError};
use super::lexer::Lexer;
use crate::ast::Node;

pub(crate) fn starts_number(lexer: &Lexer) -> bool {
    matches!(lexer.peek(), Some(c) if c.is_ascii_digit())
}

pub(crate) fn scan_number(lexer: &mut Lexer) -> Result<Node> {
    let mut lexeme = String::new();
    let mut has_dot = false;

    while let Some(c) = lexer.peek() {
        if c.is_ascii_digit() {
            lexeme.push(c);
            lexer.bump();
        } else {
            break;
        }
    }

    if lexer.peek() == Some('.') && matches!(lexer.peek_at(1), Some(c) if c.is_ascii_digit()) {
        has_dot = true;
        lexeme.push('.');
        lexer.bump();
        while let Some(c) = lexer.peek() {
            if c.is_ascii_digit() {
                lexeme.push(c);
                lexer.bump();
            } else {
                break;
            }
        }
    }

    let integer_part = if has_dot { lexeme.split('.').next().unwrap_or(&lexeme) } else { &lexeme };
    if integer_part.len() > 1 && integer_part.starts_with('0') {
        return Err(lexer.error(SyntaxError::InvalidNumber(lexeme)));
    }

    if has_dot {
        let value: f64 = lexeme
            .parse()
            .map_err(|_| lexer.error(SyntaxError::InvalidNumber(lexeme.clone())))?;
        Ok(Node::Double { value, lexeme })
    } else if let Ok(value) = lexeme.parse::<i64>() {
        Ok(Node::Int64 { value, lexeme })
    } else {
        let value: u64 = lexeme
            .parse()
            .map_err(|_| lexer.error(SyntaxError::InvalidNumber(lexeme.clone())))?;
        Ok(Node::UInt64 { value, lexeme })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(src: &str) -> Node {
        scan_number(&mut Lexer::new(src)).expect("scans")
    }

    #[test]
    fn small_integer_is_int64() {
        assert_matches::assert_matches!(scan("42"), Node::Int64 { value: 42, .. });
    }

    #[test]
    fn i64_overflowing_magnitude_widens_to_uint64() {
        assert_matches::assert_matches!(
            scan("18446744073709551615"),
            Node::UInt64 { value: 18_446_744_073_709_551_615, .. }
        );
    }

    #[test]
    fn decimal_point_forces_double() {
        assert_matches::assert_matches!(scan("1.5"), Node::Double { value, .. } if value == 1.5);
    }

    #[test]
    fn bare_zero_is_accepted() {
        assert_matches::assert_matches!(scan("0"), Node::Int64 { value: 0, .. });
    }

    #[test]
    fn leading_zero_is_rejected() {
        assert!(scan_number(&mut Lexer::new("007")).is_err());
    }
}
