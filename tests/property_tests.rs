//! Property tests for the matching API.
//!
//! Everything here goes through the public surface on a fresh
//! [`MatchEngine`] per case, so cache state never leaks between cases.
//!
//! Keyword construction note: the reference-count properties need keyword
//! sets where no keyword is a substring of another and texts where
//! occurrences cannot overlap. Generated keywords are therefore shaped
//! `<letters><index>q` (mutually substring-free by construction) and texts
//! are space-joined whole words, so the expected counts are exactly the
//! word-pick counts.

use std::collections::HashMap;

use keygate::MatchEngine;
use proptest::prelude::*;

/// Mutually substring-free keyword sets, sized across the scan-strategy
/// threshold of 20.
fn keyword_set() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z]{2,6}", 1..40).prop_map(|raws| {
        raws.into_iter().enumerate().map(|(i, raw)| format!("{raw}{i}q")).collect()
    })
}

/// A keyword set plus a text built by picking whole keywords.
fn keywords_and_picks() -> impl Strategy<Value = (Vec<String>, Vec<usize>)> {
    keyword_set().prop_flat_map(|keywords| {
        let n = keywords.len();
        (Just(keywords), prop::collection::vec(0..n, 0..60))
    })
}

fn text_of(keywords: &[String], picks: &[usize]) -> String {
    picks.iter().map(|&i| keywords[i].as_str()).collect::<Vec<_>>().join(" ")
}

fn expected_counts(keywords: &[String], picks: &[usize]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for &i in picks {
        *counts.entry(keywords[i].clone()).or_insert(0) += 1;
    }
    counts
}

/// Arbitrary well-formed expressions: keywords combined with `+`/`|` and
/// optional grouping, up to three levels deep.
fn arb_expression() -> impl Strategy<Value = String> {
    "[a-z]{2,5}".prop_recursive(3, 16, 3, |inner| {
        (prop::collection::vec(inner, 2..4), any::<bool>(), any::<bool>()).prop_map(
            |(items, and, wrap)| {
                let op = if and { "+" } else { "|" };
                let joined = items.join(op);
                if wrap { format!("({joined})") } else { joined }
            },
        )
    })
}

/// An expression plus a text built from a subset of its own keywords.
fn expression_and_text() -> impl Strategy<Value = (String, String)> {
    arb_expression().prop_flat_map(|expression| {
        let words: Vec<String> = expression
            .split(['(', ')', '+', '|'])
            .filter(|word| !word.is_empty())
            .map(str::to_string)
            .collect();
        let n = words.len();
        (Just(expression), prop::collection::vec(any::<bool>(), n)).prop_map(
            move |(expression, mask)| {
                let text = words
                    .iter()
                    .zip(&mask)
                    .filter(|(_, keep)| **keep)
                    .map(|(word, _)| word.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                (expression, text)
            },
        )
    })
}

proptest! {
    /// Both scan strategies (chosen by keyword-set size) report exactly the
    /// reference counts for an OR chain, on either side of the threshold.
    #[test]
    fn or_chain_counts_match_reference((keywords, picks) in keywords_and_picks()) {
        let engine = MatchEngine::new();
        let expression = keywords.join("|");
        let text = text_of(&keywords, &picks);
        let expected = expected_counts(&keywords, &picks);

        let result = engine.matches(&expression, &text);
        if expected.is_empty() {
            prop_assert_eq!(result, None);
        } else {
            prop_assert_eq!(result, Some(expected));
        }
    }

    /// An AND chain matches exactly when every keyword was picked.
    #[test]
    fn and_chain_matches_iff_all_keywords_present((keywords, picks) in keywords_and_picks()) {
        let engine = MatchEngine::new();
        let expression = keywords.join("+");
        let text = text_of(&keywords, &picks);
        let expected = expected_counts(&keywords, &picks);

        let result = engine.matches(&expression, &text);
        if expected.len() == keywords.len() {
            prop_assert_eq!(result, Some(expected));
        } else {
            prop_assert_eq!(result, None);
        }
    }

    /// Wrapping a pure chain in parentheses forces the general
    /// parse-and-evaluate path; the verdict and counts must not change.
    #[test]
    fn fast_path_agrees_with_general_path((keywords, picks) in keywords_and_picks()) {
        let engine = MatchEngine::new();
        let text = text_of(&keywords, &picks);
        for op in ["+", "|"] {
            let chain = keywords.join(op);
            let wrapped = format!("({chain})");
            prop_assert_eq!(engine.matches(&chain, &text), engine.matches(&wrapped, &text));
        }
    }

    /// Operand order of a chain is irrelevant to the outcome.
    #[test]
    fn chain_operand_order_is_irrelevant((keywords, picks) in keywords_and_picks()) {
        let engine = MatchEngine::new();
        let text = text_of(&keywords, &picks);
        let reversed: Vec<String> = keywords.iter().rev().cloned().collect();
        for op in ["+", "|"] {
            prop_assert_eq!(
                engine.matches(&keywords.join(op), &text),
                engine.matches(&reversed.join(op), &text)
            );
        }
    }

    /// Redundant grouping never changes the result.
    #[test]
    fn grouping_is_idempotent((expression, text) in expression_and_text()) {
        let engine = MatchEngine::new();
        let wrapped = format!("({expression})");
        let double = format!("(({expression}))");
        let plain = engine.matches(&expression, &text);
        prop_assert_eq!(engine.matches(&wrapped, &text), plain.clone());
        prop_assert_eq!(engine.matches(&double, &text), plain);
    }

    /// Matching is deterministic, cached or not.
    #[test]
    fn matching_is_deterministic((expression, text) in expression_and_text()) {
        let engine = MatchEngine::new();
        let first = engine.matches(&expression, &text);
        prop_assert_eq!(engine.matches(&expression, &text), first.clone());
        prop_assert_eq!(engine.matches(&expression, &text), first);
    }
}
