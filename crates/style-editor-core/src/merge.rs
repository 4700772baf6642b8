//! Incremental merging of classified patterns into a [`Profile`].
//!
//! For every pattern, in batch order, the existing rules are scanned in
//! stored order and the **first** rule with the same category whose text
//! matches by keyword overlap (see [`crate::keywords::rules_match`]) is
//! reinforced:
//!
//! - `occurrences += 1`
//! - the pattern's before/after pair is appended to `examples`
//! - `confidence` becomes the running mean, rounded to 3 decimals:
//!   `round((old * (n - 1) + new) / n, 3)` with `n` the new occurrence count
//!
//! Patterns with no matching rule become new rules (`occurrences = 1`,
//! confidence taken as-is). A rule created earlier in the same batch is a
//! candidate for later patterns of that batch.
//!
//! The scan is greedy and order-sensitive on purpose: rules have no stable
//! key besides `(category, free text)`, so a hash lookup would change which
//! observations merge.

use crate::keywords::rules_match;
use crate::models::{ClassifiedItem, Pattern, Profile, Rule};

/// Counts describing what one merge batch did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeSummary {
    /// Patterns read from the batch.
    pub patterns: usize,
    /// Patterns that became new rules.
    pub rules_created: usize,
    /// Patterns folded into an existing rule.
    pub rules_reinforced: usize,
}

/// Merge one batch of classifier output into `profile`.
///
/// `chapters_analyzed` is incremented exactly once per call, even when the
/// batch holds no patterns at all.
pub fn merge_patterns(
    profile: &mut Profile,
    items: &[ClassifiedItem],
    threshold: f64,
) -> MergeSummary {
    profile.chapters_analyzed += 1;

    let mut summary = MergeSummary::default();
    for pattern in items.iter().flat_map(|item| item.patterns.iter()) {
        summary.patterns += 1;
        match find_match(&mut profile.rules, pattern, threshold) {
            Some(rule) => {
                reinforce(rule, pattern);
                summary.rules_reinforced += 1;
            }
            None => {
                profile.rules.push(Rule::from_pattern(pattern));
                summary.rules_created += 1;
            }
        }
    }
    summary
}

fn find_match<'a>(rules: &'a mut [Rule], pattern: &Pattern, threshold: f64) -> Option<&'a mut Rule> {
    rules.iter_mut().find(|rule| {
        rule.category == pattern.category && rules_match(&rule.rule, &pattern.rule, threshold)
    })
}

fn reinforce(rule: &mut Rule, pattern: &Pattern) {
    rule.occurrences += 1;
    rule.examples.push(pattern.example());

    let n = f64::from(rule.occurrences);
    let previous = rule.confidence.unwrap_or(pattern.confidence);
    rule.confidence = Some(round3((previous * (n - 1.0) + pattern.confidence) / n));
}

/// Round to 3 decimal places from the exact binary value, ties to even.
///
/// Scaling by 1000 first would perturb values such as 0.0385 (stored as
/// 0.03849999...) across the rounding boundary.
fn round3(value: f64) -> f64 {
    format!("{:.3}", value).parse().unwrap_or(value)
}
