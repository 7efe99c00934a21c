//! Date and date-range literal scanning
//!
//! Two shapes share a lead-in of `YYYY-`: `YYYY-MM-DD` scans as a single
//! [`DateLit`] and bare `YYYY-YYYY` scans as a whole-year [`DateRange`]
//! running from January 1st of the first year to December 31st of the
//! second (`SPEC_FULL.md` §4.1). Which one it is falls out of whether a
//! second `-` follows the middle digit run; no lookahead beyond that is
//! needed since the separators are unambiguous.
//!
//! Fields are validated only against their literal numeric ranges (year
//! 1900-2100, month 1-12, day 1-31) — no leap-year or month-length check,
//! matching the reference implementation this grammar was distilled from.

use super::error::{Result, SyntaxError};
use super::lexer::Lexer;
use crate::ast::{DateLit, Node};

pub(crate) fn starts_date(lexer: &Lexer) -> bool {
    (0..4).all(|i| matches!(lexer.peek_at(i), Some(c) if c.is_ascii_digit()))
        && lexer.peek_at(4) == Some('-')
        && matches!(lexer.peek_at(5), Some(c) if c.is_ascii_digit())
}

fn scan_digit_run(lexer: &mut Lexer) -> String {
    let mut s = String::new();
    while let Some(c) = lexer.peek() {
        if c.is_ascii_digit() {
            s.push(c);
            lexer.bump();
        } else {
            break;
        }
    }
    s
}

fn year_in_range(y: u16) -> bool {
    (1900..=2100).contains(&y)
}

fn month_in_range(m: u8) -> bool {
    (1..=12).contains(&m)
}

fn day_in_range(d: u8) -> bool {
    (1..=31).contains(&d)
}

pub(crate) fn scan_date_or_range(lexer: &mut Lexer) -> Result<Node> {
    let mut lexeme = String::new();

    let year1_str = scan_digit_run(lexer);
    lexeme.push_str(&year1_str);
    if !lexer.eat('-') {
        return Err(lexer.error(SyntaxError::InvalidDate(lexeme)));
    }
    lexeme.push('-');

    let mid_str = scan_digit_run(lexer);
    lexeme.push_str(&mid_str);

    if lexer.eat('-') {
        lexeme.push('-');
        let day_str = scan_digit_run(lexer);
        lexeme.push_str(&day_str);
        let begin = parse_date(&year1_str, &mid_str, &day_str)
            .ok_or_else(|| lexer.error(SyntaxError::InvalidDate(lexeme.clone())))?;

        // `YYYY-MM-DD-YYYY-MM-DD`: a second full date glued on with another `-`.
        if lexer.peek() == Some('-')
            && (1..4).all(|i| matches!(lexer.peek_at(i), Some(c) if c.is_ascii_digit()))
        {
            let checkpoint = lexer.clone();
            lexer.bump();
            let year2_str = scan_digit_run(lexer);
            if lexer.eat('-') {
                let month2_str = scan_digit_run(lexer);
                if lexer.eat('-') {
                    let day2_str = scan_digit_run(lexer);
                    if let Some(end) = parse_date(&year2_str, &month2_str, &day2_str) {
                        lexeme.push('-');
                        lexeme.push_str(&year2_str);
                        lexeme.push('-');
                        lexeme.push_str(&month2_str);
                        lexeme.push('-');
                        lexeme.push_str(&day2_str);
                        return Ok(Node::DateRange(begin, end));
                    }
                }
            }
            *lexer = checkpoint;
        }

        Ok(Node::Date(begin))
    } else {
        let year2_str = mid_str;
        let from = parse_year_bound(&year1_str, 1, 1)
            .ok_or_else(|| lexer.error(SyntaxError::InvalidDate(lexeme.clone())))?;
        let to = parse_year_bound(&year2_str, 12, 31)
            .ok_or_else(|| lexer.error(SyntaxError::InvalidDate(lexeme.clone())))?;
        Ok(Node::DateRange(from, to))
    }
}

fn parse_date(year: &str, month: &str, day: &str) -> Option<DateLit> {
    if year.len() != 4 || month.is_empty() || month.len() > 2 || day.is_empty() || day.len() > 2 {
        return None;
    }
    let year: u16 = year.parse().ok()?;
    let month: u8 = month.parse().ok()?;
    let day: u8 = day.parse().ok()?;
    if !year_in_range(year) || !month_in_range(month) || !day_in_range(day) {
        return None;
    }
    Some(DateLit { year, month, day })
}

fn parse_year_bound(year: &str, month: u8, day: u8) -> Option<DateLit> {
    if year.len() != 4 {
        return None;
    }
    let year: u16 = year.parse().ok()?;
    if !year_in_range(year) {
        return None;
    }
    Some(DateLit { year, month, day })
}
