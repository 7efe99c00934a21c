//! Quoted string literal scanning
//!
//! Handles `"..."` literals and their escape sequences: `\b \t \n \f \r \v`,
//! octal escapes of one to three digits, `\x` followed by exactly two hex
//! digits, and a catch-all `\<char>` that yields the character literally.
//! A raw (unescaped) newline inside the quotes is a [`SyntaxError::UnterminatedString`],
//! matching most C-family lexers.

use super::error::{Result, SyntaxError};
use super::lexer::Lexer;

pub(crate) fn scan_quoted_string(lexer: &mut Lexer) -> Result<String> {
    let start = lexer.location();
    if !lexer.eat('"') {
        return Err(lexer.error_expecting('"'));
    }

    let mut out = String::new();
    loop {
        match lexer.peek() {
            None => return Err(lexer.error(SyntaxError::UnterminatedString)),
            Some('"') => {
                lexer.bump();
                break;
            }
            Some('\n') => return Err(lexer.error(SyntaxError::UnterminatedString)),
            Some('\\') => {
                lexer.bump();
                out.push(scan_escape(lexer)?);
            }
            Some(c) => {
                lexer.bump();
                out.push(c);
            }
        }
    }
    let _ = start;
    Ok(out)
}

fn scan_escape(lexer: &mut Lexer) -> Result<char> {
    let Some(c) = lexer.peek() else {
        return Err(lexer.error(SyntaxError::InvalidEscape));
    };
    match c {
        'b' => {
            lexer.bump();
            Ok('\u{8}')
        }
        't' => {
            lexer.bump();
            Ok('\t')
        }
        'n' => {
            lexer.bump();
            Ok('\n')
        }
        'f' => {
            lexer.bump();
            Ok('\u{c}')
        }
        'r' => {
            lexer.bump();
            Ok('\r')
        }
        'v' => {
            lexer.bump();
            Ok('\u{b}')
        }
        'x' => {
            lexer.bump();
            let mut digits = String::new();
            for _ in 0..2 {
                match lexer.peek() {
                    Some(c) if c.is_ascii_hexdigit() => {
                        digits.push(c);
                        lexer.bump();
                    }
                    _ => return Err(lexer.error(SyntaxError::InvalidEscape)),
                }
            }
            let code = u32::from_str_radix(&digits, 16).unwrap();
            char::from_u32(code).ok_or_else(|| lexer.error(SyntaxError::InvalidEscape))
        }
        '0'..='7' => {
            let mut digits = String::new();
            for _ in 0..3 {
                match lexer.peek() {
                    Some(c) if ('0'..='7').contains(&c) => {
                        digits.push(c);
                        lexer.bump();
                    }
                    _ => break,
                }
            }
            let code = u32::from_str_radix(&digits, 8)
                .map_err(|_| lexer.error(SyntaxError::InvalidEscape))?;
            char::from_u32(code).ok_or_else(|| lexer.error(SyntaxError::InvalidEscape))
        }
        other => {
            lexer.bump();
            Ok(other)
        }
    }
}
