//! Surface-syntax classification and trivial-rule fast paths.
//!
//! The overwhelming majority of production rules are flat chains: `a+b+c`
//! or `a|b|c`. Those never need an AST: a pure AND chain matches exactly
//! when every keyword was found, a pure OR chain when any was. Classifying
//! the raw expression by which operator characters it contains lets the
//! engine answer them with two set operations and reserve parsing for rules
//! with grouping or mixed operators.
//!
//! The fast paths must be indistinguishable from evaluating the equivalent
//! all-literal `And`/`Or` tree; the tests below check them against the
//! general evaluator directly.

use std::collections::{BTreeSet, HashSet};

bitflags::bitflags! {
    /// Operator characters present in a stripped expression.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SyntaxFlags: u8 {
        const HAS_AND   = 1 << 0;
        const HAS_OR    = 1 << 1;
        /// Only `(` opens a group. A stray `)` never does; the parser stops
        /// scanning at it, so a chain with a trailing `)` still matches as
        /// a chain.
        const HAS_GROUP = 1 << 2;
    }
}

impl SyntaxFlags {
    /// Scan `expression` for operator characters.
    pub fn scan(expression: &str) -> Self {
        let mut flags = SyntaxFlags::empty();
        for byte in expression.bytes() {
            match byte {
                b'+' => flags |= SyntaxFlags::HAS_AND,
                b'|' => flags |= SyntaxFlags::HAS_OR,
                b'(' => flags |= SyntaxFlags::HAS_GROUP,
                _ => {}
            }
        }
        flags
    }
}

/// Shape of a rule, decided by surface syntax alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleShape {
    /// `a+b+c`, a conjunction of bare keywords.
    AndChain,
    /// `a|b|c`, a disjunction of bare keywords.
    OrChain,
    /// Everything else, including a single bare keyword: parse + evaluate.
    General,
}

impl RuleShape {
    pub fn classify(expression: &str) -> Self {
        let flags = SyntaxFlags::scan(expression);
        if flags == SyntaxFlags::HAS_AND {
            RuleShape::AndChain
        } else if flags == SyntaxFlags::HAS_OR {
            RuleShape::OrChain
        } else {
            RuleShape::General
        }
    }
}

/// Pure AND chain: every keyword must have been found.
pub fn and_chain_matches(keywords: &BTreeSet<String>, found: &HashSet<&str>) -> bool {
    keywords.iter().all(|keyword| found.contains(keyword.as_str()))
}

/// Pure OR chain: one found keyword suffices.
pub fn or_chain_matches(keywords: &BTreeSet<String>, found: &HashSet<&str>) -> bool {
    keywords.iter().any(|keyword| found.contains(keyword.as_str()))
}
