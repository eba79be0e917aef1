//! Public matching API.
//!
//! [`expr_match`] is the sole matching entry point: it decides whether a
//! text satisfies a keyword expression and, on a match, returns how often
//! each of the rule's keywords occurs in the text. Absence of a match,
//! including a malformed rule, a rule with no keywords, or an empty text,
//! is always `None`, never a panic or an error value: a bad rule must not
//! take down a pipeline that is matching thousands of others.
//!
//! The free functions operate on a process-wide [`MatchEngine`] whose three
//! caches live for the lifetime of the program and are only ever reset
//! through [`invalidate_cache`]. Embedders that want isolated cache state
//! (or deterministic cache statistics in tests) can construct their own
//! engine with [`MatchEngine::new`].

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use tracing::{debug, info, warn};

use crate::Expr;
use crate::engine::{
    BoundedCache, EXPRESSION_CACHE_CAPACITY, ExprKey, REGEX_SCAN_CACHE_CAPACITY, RuleShape,
    SIMPLE_SCAN_CACHE_CAPACITY, SIMPLE_STRATEGY_MAX_KEYWORDS, ScanKey, and_chain_matches,
    evaluate, extract_keywords, or_chain_matches, parse, scan_regex, scan_simple,
};

pub use crate::engine::CacheCounters;

/// Occurrence counts for the rule keywords found in a text, case-folded.
pub type KeywordCounts = HashMap<String, usize>;

/// Snapshot of cache diagnostics, for monitoring cache effectiveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Current cache generation; bumped by every invalidation.
    pub generation: u64,
    pub simple_scan: CacheCounters,
    pub regex_scan: CacheCounters,
    pub expressions: CacheCounters,
}

static ENGINE: Lazy<MatchEngine> = Lazy::new(MatchEngine::new);

/// Match `expression` against `text` using the process-wide engine.
///
/// The expression grammar combines literal keywords with `+` (AND), `|`
/// (OR), and parentheses; matching is case-insensitive and substring-based.
/// Returns the per-keyword occurrence counts on a match, `None` otherwise.
///
/// # Example
/// ```
/// use keygate::expr_match;
///
/// let counts = expr_match("(airbus|boeing)+safety", "Boeing safety update").unwrap();
/// assert_eq!(counts["boeing"], 1);
/// assert_eq!(counts["safety"], 1);
///
/// assert!(expr_match("airbus+a320", "Airbus A350 update").is_none());
/// ```
pub fn expr_match(expression: &str, text: &str) -> Option<KeywordCounts> {
    ENGINE.matches(expression, text)
}

/// Bump the cache generation and drop every cached entry of the
/// process-wide engine. Call when the universe of rules or keywords
/// changes externally.
pub fn invalidate_cache() {
    ENGINE.invalidate_cache();
}

/// Read-only cache diagnostics of the process-wide engine.
pub fn cache_stats() -> CacheStats {
    ENGINE.cache_stats()
}

/// Boolean keyword-expression matching engine.
///
/// Stateless per call except for the caches; calls may run concurrently
/// from any number of threads. See the module docs of `crate::engine` for
/// the pipeline a call flows through.
pub struct MatchEngine {
    simple_scan: BoundedCache<ScanKey, Arc<KeywordCounts>>,
    regex_scan: BoundedCache<ScanKey, Arc<KeywordCounts>>,
    /// `None` is the sentinel for "failed to parse": a bad rule costs one
    /// parse attempt per generation, not one per call.
    expressions: BoundedCache<ExprKey, Option<Arc<Expr>>>,
    generation: AtomicU64,
    /// Serializes invalidations against each other; lookups never take it.
    invalidation: Mutex<()>,
}

impl MatchEngine {
    pub fn new() -> Self {
        Self {
            simple_scan: BoundedCache::new(SIMPLE_SCAN_CACHE_CAPACITY),
            regex_scan: BoundedCache::new(REGEX_SCAN_CACHE_CAPACITY),
            expressions: BoundedCache::new(EXPRESSION_CACHE_CAPACITY),
            generation: AtomicU64::new(0),
            invalidation: Mutex::new(()),
        }
    }

    /// Match `expression` against `text`. See [`expr_match`].
    pub fn matches(&self, expression: &str, text: &str) -> Option<KeywordCounts> {
        let expression: String = expression.chars().filter(|c| !c.is_whitespace()).collect();
        let keywords = extract_keywords(&expression);
        if keywords.is_empty() {
            debug!(%expression, "rule has no keywords");
            return None;
        }

        let text = text.to_lowercase();
        let generation = self.generation.load(Ordering::Acquire);

        let counts = self.scan_cached(&text, &keywords, generation);
        if counts.is_empty() {
            return None;
        }
        let found: HashSet<&str> = counts.keys().map(String::as_str).collect();

        let matched = match RuleShape::classify(&expression) {
            RuleShape::AndChain => and_chain_matches(&keywords, &found),
            RuleShape::OrChain => or_chain_matches(&keywords, &found),
            RuleShape::General => match self.parse_cached(&expression, generation) {
                Some(ast) => evaluate(&ast, &found),
                None => false,
            },
        };

        matched.then(|| (*counts).clone())
    }

    /// Bump the generation and drop every cached entry.
    ///
    /// The bump alone already strands old-generation keys; clearing also
    /// frees their storage immediately. A lookup racing this sees either
    /// the old or the new generation, never a mix.
    pub fn invalidate_cache(&self) {
        let _exclusive = self.invalidation.lock().unwrap();
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        self.simple_scan.clear();
        self.regex_scan.clear();
        self.expressions.clear();
        info!(generation, "caches cleared");
    }

    /// Read-only cache diagnostics.
    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            generation: self.generation.load(Ordering::Acquire),
            simple_scan: self.simple_scan.counters(),
            regex_scan: self.regex_scan.counters(),
            expressions: self.expressions.counters(),
        }
    }

    /// Scan `text` for `keywords`, memoized per strategy.
    fn scan_cached(
        &self,
        text: &str,
        keywords: &BTreeSet<String>,
        generation: u64,
    ) -> Arc<KeywordCounts> {
        let simple = keywords.len() <= SIMPLE_STRATEGY_MAX_KEYWORDS;
        let cache = if simple { &self.simple_scan } else { &self.regex_scan };

        let key = ScanKey {
            text: text.to_string(),
            keywords: keywords.iter().cloned().collect(),
            generation,
        };
        if let Some(counts) = cache.lookup(&key) {
            return counts;
        }

        // Computed outside the cache lock; on a concurrent miss both
        // threads produce the same pure value and the last insert wins.
        let counts = if simple { scan_simple(text, keywords) } else { scan_regex(text, keywords) };
        let counts = Arc::new(counts);
        cache.insert(key, Arc::clone(&counts));
        counts
    }

    /// Parse `expression`, memoized. Syntax failures are logged, cached as
    /// `None`, and reported as an unmatchable rule; fail closed.
    fn parse_cached(&self, expression: &str, generation: u64) -> Option<Arc<Expr>> {
        let key = ExprKey { expression: expression.to_string(), generation };
        if let Some(cached) = self.expressions.lookup(&key) {
            return cached;
        }

        let parsed = match parse(expression) {
            Ok(ast) => Some(Arc::new(ast)),
            Err(error) => {
                warn!(%expression, %error, "rule failed to parse, treating as non-matching");
                None
            }
        };
        self.expressions.insert(key, parsed.clone());
        parsed
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new()
    }
}
