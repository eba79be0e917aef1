//! Matching engine.
//!
//! This module is the internal core behind the public API in `src/api.rs`.
//! Answering "does this text satisfy this rule?" is a short pipeline:
//!
//! ```text
//! expression ── strip whitespace ── extract keywords (scanner.rs)
//!                                         │
//! text ── lowercase ──────────────────────┤
//!                                         ▼
//!                              scan for occurrences (scanner.rs, cached)
//!                                         │
//!                                         ▼
//!                     RuleShape::classify (dispatch.rs)
//!                      │                          │
//!                      │ pure AND / OR chain      │ general shape
//!                      ▼                          ▼
//!               set check, no parse      parse (parser.rs, cached)
//!                                                 │
//!                                                 ▼
//!                                        evaluate (evaluator.rs)
//! ```
//!
//! ## Responsibilities by module
//!
//! - `scanner.rs`: extracts the keyword set of an expression and counts
//!   occurrences in a text, with two interchangeable strategies selected by
//!   keyword-set size.
//! - `dispatch.rs`: classifies an expression by surface syntax so trivial
//!   chains never pay for parsing or AST allocation.
//! - `parser.rs`: single-scan recursive-descent parser for the rule grammar.
//! - `evaluator.rs`: pure recursive evaluation of an [`crate::Expr`] against
//!   the set of keywords the scanner found.
//! - `cache.rs`: bounded LRU memoization of scan results and parsed
//!   expressions, keyed by a generation number for bulk invalidation.
//!
//! ## Determinism
//!
//! Every stage is a pure function of its inputs; the caches only memoize.
//! Given the same expression and text, the engine returns the same result no
//! matter which entries are cached, which is what makes last-write-wins
//! insertion races benign.

#[path = "engine/cache.rs"]
mod cache;
#[path = "engine/dispatch.rs"]
mod dispatch;
#[path = "engine/evaluator.rs"]
mod evaluator;
#[path = "engine/parser.rs"]
mod parser;
#[path = "engine/scanner.rs"]
mod scanner;

pub use cache::{
    BoundedCache, CacheCounters, EXPRESSION_CACHE_CAPACITY, ExprKey, REGEX_SCAN_CACHE_CAPACITY,
    SIMPLE_SCAN_CACHE_CAPACITY, ScanKey,
};
pub use dispatch::{RuleShape, and_chain_matches, or_chain_matches};
pub use evaluator::evaluate;
pub use parser::parse;
pub use scanner::{
    SIMPLE_STRATEGY_MAX_KEYWORDS, extract_keywords, scan_regex, scan_simple,
};
