//! Keyword-overlap similarity between free-text rule descriptions.
//!
//! Two rules are considered "the same" editing pattern when the smaller of
//! their keyword sets is mostly contained in the other:
//!
//! ```text
//!                 |A ∩ B|
//! similarity = ─────────────
//!              min(|A|, |B|)
//! ```
//!
//! Keywords are lower-cased, whitespace-separated tokens with a small set of
//! stop words removed. Punctuation is not stripped: `"words."` and `"words"`
//! are different keywords.

use std::collections::HashSet;

/// Default minimum similarity for two rules to match.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.4;

/// Tokens ignored when building a keyword set.
pub const STOP_WORDS: [&str; 19] = [
    "a", "an", "the", "and", "or", "of", "to", "in", "is", "it", "for", "with", "on", "at", "by",
    "from", "that", "this", "as",
];

/// Extract the lower-cased, stop-word-free keyword set of `text`.
pub fn keyword_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|word| !STOP_WORDS.contains(word))
        .map(str::to_string)
        .collect()
}

/// Keyword-overlap similarity of two texts.
///
/// Returns `None` when either text has no keywords left after stop-word
/// removal; the ratio is undefined there and callers treat it as a
/// non-match.
pub fn overlap_similarity(a: &str, b: &str) -> Option<f64> {
    let a = keyword_set(a);
    let b = keyword_set(b);
    if a.is_empty() || b.is_empty() {
        return None;
    }
    let overlap = a.intersection(&b).count();
    let smaller = a.len().min(b.len());
    Some(overlap as f64 / smaller as f64)
}

/// Whether `new_rule` matches `existing_rule` at the given threshold.
///
/// The comparison is inclusive: a similarity exactly equal to `threshold`
/// matches.
pub fn rules_match(existing_rule: &str, new_rule: &str, threshold: f64) -> bool {
    overlap_similarity(existing_rule, new_rule).is_some_and(|sim| sim >= threshold)
}
