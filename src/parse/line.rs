//! Single-line MRC grammar.
//!
//! ```text
//! line      := [ratio WS] count WS size WS hitpct '%' WS '(' WS hits WS '/' WS total WS ')' WS
//! count     := digits
//! size      := digits
//! hitpct    := digits ['.' digits]      (validated, not retained)
//! hits      := digits
//! total     := digits
//! ```
//!
//! `ratio` is only present for `LineGrammar::RatioPrefixed`. Whitespace (any
//! Unicode whitespace) is consumed after each token, never before the first one.

use std::fmt;

use thiserror::Error;

use crate::domain::{CacheStat, LineGrammar, MissRatePoint};

/// Token classes the parser can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    PositiveInteger,
    DecimalNumber,
    Percent,
    OpenParen,
    Slash,
    CloseParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Token::PositiveInteger => "positive integer",
            Token::DecimalNumber => "decimal number",
            Token::Percent => "'%'",
            Token::OpenParen => "'('",
            Token::Slash => "'/'",
            Token::CloseParen => "')'",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("expected {0}")]
    Expected(Token),
    #[error("unexpected trailing input")]
    TrailingInput,
    #[error("hit count {hits} exceeds total {total}")]
    HitsExceedTotal { hits: u64, total: u64 },
    #[error("integer does not fit in 64 bits")]
    Overflow,
}

/// A line that does not match the grammar.
///
/// `offset` is the byte offset into the line where matching stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("at byte {offset}: {kind}")]
pub struct ParseError {
    pub offset: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    fn new(offset: usize, kind: ParseErrorKind) -> Self {
        Self { offset, kind }
    }
}

/// Parse one MRC line using `grammar`.
///
/// The hit percentage is checked for shape only; hits and misses come from the
/// `(hits/total)` fraction.
pub fn parse_point(line: &str, grammar: LineGrammar) -> Result<MissRatePoint, ParseError> {
    let mut cur = Cursor::new(line);

    if grammar == LineGrammar::RatioPrefixed {
        cur.decimal()?;
    }

    let count = cur.integer()?;
    let size = cur.integer()?;

    cur.decimal_raw()?;
    cur.literal(b'%', Token::Percent)?;

    cur.literal(b'(', Token::OpenParen)?;
    let hits_at = cur.pos;
    let hits = cur.integer()?;
    cur.literal(b'/', Token::Slash)?;
    let total = cur.integer()?;
    cur.literal(b')', Token::CloseParen)?;
    cur.finish()?;

    let Some(misses) = total.checked_sub(hits) else {
        return Err(ParseError::new(
            hits_at,
            ParseErrorKind::HitsExceedTotal { hits, total },
        ));
    };

    Ok(MissRatePoint {
        count,
        size,
        stat: CacheStat::new(hits, misses),
    })
}

struct Cursor<'a> {
    line: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            line,
            bytes: line.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Any Unicode whitespace, so `pos` stays on a char boundary.
    fn skip_ws(&mut self) {
        let rest = self.line.get(self.pos..).unwrap_or_default();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn digits(&mut self) -> &'a [u8] {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        &self.bytes[start..self.pos]
    }

    fn integer(&mut self) -> Result<u64, ParseError> {
        let start = self.pos;
        let digits = self.digits();
        if digits.is_empty() {
            return Err(ParseError::new(start, ParseErrorKind::Expected(Token::PositiveInteger)));
        }
        let mut n: u64 = 0;
        for &d in digits {
            n = n
                .checked_mul(10)
                .and_then(|n| n.checked_add(u64::from(d - b'0')))
                .ok_or(ParseError::new(start, ParseErrorKind::Overflow))?;
        }
        self.skip_ws();
        Ok(n)
    }

    /// `digits ['.' digits]` with no trailing whitespace.
    fn decimal_raw(&mut self) -> Result<f64, ParseError> {
        let start = self.pos;
        let expected = ParseError::new(start, ParseErrorKind::Expected(Token::DecimalNumber));
        if self.digits().is_empty() {
            return Err(expected);
        }
        // The fractional part is only taken when a digit follows the dot.
        if self.peek() == Some(b'.') && self.bytes.get(self.pos + 1).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
            self.digits();
        }
        // Only ASCII digits and '.' were consumed, so the slice is valid UTF-8.
        std::str::from_utf8(&self.bytes[start..self.pos])
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or(expected)
    }

    fn decimal(&mut self) -> Result<f64, ParseError> {
        let v = self.decimal_raw()?;
        self.skip_ws();
        Ok(v)
    }

    fn literal(&mut self, byte: u8, token: Token) -> Result<(), ParseError> {
        if self.peek() != Some(byte) {
            return Err(ParseError::new(self.pos, ParseErrorKind::Expected(token)));
        }
        self.pos += 1;
        self.skip_ws();
        Ok(())
    }

    fn finish(&self) -> Result<(), ParseError> {
        if self.pos == self.bytes.len() {
            Ok(())
        } else {
            Err(ParseError::new(self.pos, ParseErrorKind::TrailingInput))
        }
    }
}
