//! Recursive-descent rule parser.
//!
//! Grammar (precedence low → high; AND binds tighter than OR, both
//! left-associative):
//!
//! ```text
//! expression := or_expr
//! or_expr    := and_expr ('|' and_expr)*
//! and_expr   := term ('+' term)*
//! term       := '(' expression ')' | KEYWORD
//! KEYWORD    := one or more characters excluding '(', ')', '+', '|'
//! ```
//!
//! The input is the whitespace-stripped expression, so there is no separate
//! lexer: every operator is a single ASCII byte and keyword runs end on
//! operator bytes only, which keeps byte-cursor slicing UTF-8 safe.
//!
//! Parsing is a single left-to-right scan with no backtracking (the grammar
//! is LL(1)). Single-item productions collapse, so the resulting [`Expr`]
//! never contains a singleton `And`/`Or`. Parentheses only establish
//! grouping; they produce no node of their own.
//!
//! ## Leniency
//!
//! - An unterminated `(` is tolerated: the group ends at end-of-input.
//! - An unmatched `)` ends the enclosing group. At top level it ends the
//!   whole scan and anything after it is ignored.
//! - A stray operator with no operand (`a++b`, `|a`, `a+`) is a hard
//!   [`ParseError`]; callers treat the rule as permanently non-matching.

use thiserror::Error;

use crate::Expr;

/// Parse failure for a rule expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// An operator had no operand where a keyword or group was required.
    #[error("expected a keyword or '(' at byte {position}")]
    EmptyTerm { position: usize },
}

/// Parse a whitespace-stripped expression into an [`Expr`].
///
/// Literal words are case-folded here, once, at construction.
pub fn parse(expression: &str) -> Result<Expr, ParseError> {
    Cursor { src: expression, pos: 0 }.or_expr()
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    /// or_expr := and_expr ('|' and_expr)*
    fn or_expr(&mut self) -> Result<Expr, ParseError> {
        let mut items = vec![self.and_expr()?];
        while self.peek() == Some(b'|') {
            self.bump();
            items.push(self.and_expr()?);
        }
        Ok(collapse(items, Expr::Or))
    }

    /// and_expr := term ('+' term)*
    fn and_expr(&mut self) -> Result<Expr, ParseError> {
        let mut items = vec![self.term()?];
        while self.peek() == Some(b'+') {
            self.bump();
            items.push(self.term()?);
        }
        Ok(collapse(items, Expr::And))
    }

    /// term := '(' expression ')' | KEYWORD
    fn term(&mut self) -> Result<Expr, ParseError> {
        if self.peek() == Some(b'(') {
            self.bump();
            let inner = self.or_expr()?;
            // Missing ')' means the group runs to end-of-input.
            if self.peek() == Some(b')') {
                self.bump();
            }
            return Ok(inner);
        }
        self.keyword()
    }

    /// KEYWORD := maximal run of non-operator bytes.
    fn keyword(&mut self) -> Result<Expr, ParseError> {
        let start = self.pos;
        while let Some(byte) = self.peek() {
            if matches!(byte, b'(' | b')' | b'+' | b'|') {
                break;
            }
            self.bump();
        }
        if self.pos == start {
            return Err(ParseError::EmptyTerm { position: start });
        }
        Ok(Expr::Literal(self.src[start..self.pos].to_lowercase()))
    }
}

fn collapse(mut items: Vec<Expr>, wrap: fn(Vec<Expr>) -> Expr) -> Expr {
    if items.len() == 1 { items.remove(0) } else { wrap(items) }
}
