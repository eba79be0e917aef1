//! Keyword extraction and occurrence scanning.
//!
//! The scanner answers "which of this rule's keywords occur in this text,
//! and how many times?". Two interchangeable strategies exist, selected by
//! keyword-set size:
//!
//! - [`scan_simple`]: one substring count per keyword, O(k·n). Wins for the
//!   small keyword sets that dominate real rules.
//! - [`scan_regex`]: a single alternation over all escaped keywords, one
//!   pass over the text, O(n) regardless of k. Wins once per-keyword passes
//!   stop amortizing.
//!
//! Both count raw, non-overlapping substring occurrences, deliberately not
//! word-boundary aware (`737` inside `737-800` counts). The crossover point
//! [`SIMPLE_STRATEGY_MAX_KEYWORDS`] is a tuning constant, not a correctness
//! boundary; the strategies agree whenever keyword occurrences in the text
//! do not overlap each other, which the tests pin down.

use std::collections::{BTreeSet, HashMap};

use regex::Regex;
use tracing::warn;

/// Largest keyword-set size still scanned with the per-keyword strategy.
pub const SIMPLE_STRATEGY_MAX_KEYWORDS: usize = 20;

/// Extract the distinct, case-folded keywords of a whitespace-stripped
/// expression: every maximal run of characters that is not an operator.
///
/// The ordered set doubles as the canonical form for cache keys and for the
/// alternation pattern, keeping both deterministic.
pub fn extract_keywords(expression: &str) -> BTreeSet<String> {
    regex!(r"[^()+|]+")
        .find_iter(expression)
        .map(|keyword| keyword.as_str().to_lowercase())
        .collect()
}

/// Count non-overlapping occurrences of each keyword in `text`.
///
/// `text` and `keywords` must already be lowercase. Only keywords with a
/// count above zero appear in the output.
pub fn scan_simple(text: &str, keywords: &BTreeSet<String>) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for keyword in keywords {
        let count = text.matches(keyword.as_str()).count();
        if count > 0 {
            counts.insert(keyword.clone(), count);
        }
    }
    counts
}

/// Count keyword occurrences with one alternation pass over `text`.
///
/// Keywords are escaped, so regex metacharacters in rules stay literal. If
/// the alternation fails to compile (a pathological keyword set), the scan
/// degrades to [`scan_simple`] rather than failing the match call.
pub fn scan_regex(text: &str, keywords: &BTreeSet<String>) -> HashMap<String, usize> {
    if keywords.is_empty() {
        return HashMap::new();
    }

    let pattern =
        keywords.iter().map(|keyword| regex::escape(keyword)).collect::<Vec<_>>().join("|");
    let alternation = match Regex::new(&pattern) {
        Ok(alternation) => alternation,
        Err(error) => {
            warn!(%error, keywords = keywords.len(), "keyword alternation failed to compile, falling back to per-keyword scan");
            return scan_simple(text, keywords);
        }
    };

    let mut counts: HashMap<String, usize> = HashMap::new();
    for found in alternation.find_iter(text) {
        *counts.entry(found.as_str().to_string()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|word| word.to_string()).collect()
    }

    fn counts(pairs: &[(&str, usize)]) -> HashMap<String, usize> {
        pairs.iter().map(|(word, count)| (word.to_string(), *count)).collect()
    }

    #[test]
    fn extraction_dedupes_and_case_folds() {
        let extracted = extract_keywords("(Airbus|BOEING)+airbus+a320");
        assert_eq!(extracted, keywords(&["a320", "airbus", "boeing"]));
    }

    #[test]
    fn extraction_of_operator_only_expression_is_empty() {
        assert!(extract_keywords("+|()").is_empty());
        assert!(extract_keywords("").is_empty());
    }

    #[test]
    fn simple_scan_counts_substrings() {
        // Substring semantics: "737" inside "737-800" counts.
        let found = scan_simple("boeing 737-800 and 737 max", &keywords(&["737", "airbus"]));
        assert_eq!(found, counts(&[("737", 2)]));
    }

    #[test]
    fn simple_scan_counts_non_overlapping() {
        let found = scan_simple("aaaa", &keywords(&["aa"]));
        assert_eq!(found, counts(&[("aa", 2)]));
    }

    #[test]
    fn regex_scan_escapes_metacharacters() {
        let found = scan_regex("version 1.5 and 1x5", &keywords(&["1.5"]));
        assert_eq!(found, counts(&[("1.5", 1)]));
    }

    #[test]
    fn regex_scan_of_empty_keyword_set_is_empty() {
        assert!(scan_regex("anything", &BTreeSet::new()).is_empty());
    }

    #[test]
    fn strategies_agree_on_plain_text() {
        let cases: Vec<(&str, Vec<&str>)> = vec![
            ("the airbus fleet", vec!["airbus", "boeing"]),
            ("boeing 737 update boeing", vec!["737", "boeing"]),
            ("", vec!["airbus"]),
            ("no hits at all", vec!["airbus", "a320"]),
            ("空调 维修 空调", vec!["空调", "维修"]),
        ];
        for (text, words) in cases {
            let set = keywords(&words);
            assert_eq!(scan_simple(text, &set), scan_regex(text, &set), "text: {text:?}");
        }
    }

    #[test]
    fn strategies_agree_across_the_size_threshold() {
        // Generated sweep: k distinct keywords, a text mentioning every
        // third one twice, for set sizes on both sides of the crossover.
        for k in [1, 5, 19, 20, 21, 40] {
            let words: Vec<String> = (0..k).map(|i| format!("kw{i}x")).collect();
            let set: BTreeSet<String> = words.iter().cloned().collect();
            let text = words
                .iter()
                .enumerate()
                .filter(|(i, _)| i % 3 == 0)
                .map(|(_, word)| format!("{word} {word}"))
                .collect::<Vec<_>>()
                .join(" ");
            assert_eq!(scan_simple(&text, &set), scan_regex(&text, &set), "k = {k}");
        }
    }
}
