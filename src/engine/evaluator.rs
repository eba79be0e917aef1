//! Rule evaluation against a found-keyword set.
//!
//! A pure function of (AST, found set): no side effects, no allocation.
//! Callers short-circuit before getting here when the scanner found nothing
//! at all, so evaluation only runs for texts with at least one keyword hit.

use std::collections::HashSet;

use crate::Expr;

/// Does `found` satisfy `expr`?
///
/// `found` holds the case-folded keywords the scanner located in the text;
/// literal words in the tree are case-folded at parse time, so membership is
/// a direct set lookup.
pub fn evaluate(expr: &Expr, found: &HashSet<&str>) -> bool {
    match expr {
        Expr::Literal(word) => found.contains(word.as_str()),
        Expr::And(items) => items.iter().all(|item| evaluate(item, found)),
        Expr::Or(items) => items.iter().any(|item| evaluate(item, found)),
    }
}
