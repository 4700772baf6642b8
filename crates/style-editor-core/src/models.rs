//! Core data models: classifier patterns and the persisted style profile.
//!
//! The JSON shape of [`Profile`] is the on-disk format:
//!
//! ```json
//! {
//!   "rules": [
//!     {
//!       "category": "prose_tightening",
//!       "rule": "Cut filter words",
//!       "occurrences": 2,
//!       "confidence": 0.85,
//!       "examples": [{ "before": "He felt tired.", "after": "Tired." }]
//!     }
//!   ],
//!   "chapters_analyzed": 3
//! }
//! ```
//!
//! Every field is defaulted on decode so hand-edited or older profiles load.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Closed vocabulary of style categories.
///
/// Unknown category names decode as [`Category::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    ProseTightening,
    DialogueAdjustment,
    PacingChanges,
    ToneShifts,
    ShowVsTell,
    InternalMonologue,
    CombatWriting,
    WorldBuilding,
    SensoryDetail,
    MetaphorRefinement,
    VoiceConsistency,
    RepetitionRemoval,
    SentenceStructure,
    #[default]
    #[serde(other)]
    Other,
}

impl Category {
    /// Every category, in vocabulary order.
    pub const ALL: [Category; 14] = [
        Category::ProseTightening,
        Category::DialogueAdjustment,
        Category::PacingChanges,
        Category::ToneShifts,
        Category::ShowVsTell,
        Category::InternalMonologue,
        Category::CombatWriting,
        Category::WorldBuilding,
        Category::SensoryDetail,
        Category::MetaphorRefinement,
        Category::VoiceConsistency,
        Category::RepetitionRemoval,
        Category::SentenceStructure,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::ProseTightening => "prose_tightening",
            Category::DialogueAdjustment => "dialogue_adjustment",
            Category::PacingChanges => "pacing_changes",
            Category::ToneShifts => "tone_shifts",
            Category::ShowVsTell => "show_vs_tell",
            Category::InternalMonologue => "internal_monologue",
            Category::CombatWriting => "combat_writing",
            Category::WorldBuilding => "world_building",
            Category::SensoryDetail => "sensory_detail",
            Category::MetaphorRefinement => "metaphor_refinement",
            Category::VoiceConsistency => "voice_consistency",
            Category::RepetitionRemoval => "repetition_removal",
            Category::SentenceStructure => "sentence_structure",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = std::convert::Infallible;

    /// Never fails: unrecognised names map to [`Category::Other`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .unwrap_or(Category::Other))
    }
}

/// A classifier's judgment about one edit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub rule: String,
    /// Score in `[0, 1]`.
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub example_before: String,
    #[serde(default)]
    pub example_after: String,
}

fn default_confidence() -> f64 {
    0.5
}

impl Pattern {
    /// The before/after pair this pattern contributes to a rule.
    pub fn example(&self) -> Example {
        Example {
            before: self.example_before.clone(),
            after: self.example_after.clone(),
        }
    }
}

/// Classifier output for one edit record: zero or more patterns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassifiedItem {
    /// Traceability only. Anything other than a non-negative integer
    /// decodes as `None` rather than rejecting the item.
    #[serde(default, deserialize_with = "lenient_index")]
    pub paragraph_index: Option<usize>,
    #[serde(default)]
    pub patterns: Vec<Pattern>,
}

fn lenient_index<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Index(usize),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Index(i) => Some(i),
        Raw::Other(_) => None,
    })
}

/// An illustrative before/after pair stored on a rule.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Example {
    #[serde(default)]
    pub before: String,
    #[serde(default)]
    pub after: String,
}

/// A persisted, deduplicated style rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub category: Category,
    /// Canonical description, fixed when the rule is first created.
    #[serde(default)]
    pub rule: String,
    #[serde(default = "default_occurrences")]
    pub occurrences: u32,
    /// Running mean of every observed confidence. `None` only for a
    /// hand-written profile entry; the next observation then seeds it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Oldest first.
    #[serde(default)]
    pub examples: Vec<Example>,
}

fn default_occurrences() -> u32 {
    1
}

impl Rule {
    /// A fresh rule seeded from its first observation.
    pub fn from_pattern(pattern: &Pattern) -> Self {
        Self {
            category: pattern.category,
            rule: pattern.rule.clone(),
            occurrences: 1,
            confidence: Some(pattern.confidence),
            examples: vec![pattern.example()],
        }
    }
}

/// The accumulated style profile.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Profile {
    /// Rules in creation order; matched by linear fuzzy scan.
    #[serde(default)]
    pub rules: Vec<Rule>,
    /// Number of merge batches applied to this profile.
    #[serde(default)]
    pub chapters_analyzed: u32,
}

impl Profile {
    /// A profile with no rules that has never been merged into.
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules ordered by descending occurrence count; ties keep creation order.
    pub fn rules_by_occurrence(&self) -> Vec<&Rule> {
        let mut rules: Vec<&Rule> = self.rules.iter().collect();
        rules.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));
        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn test_unknown_category_is_other() {
        let parsed: Category = serde_json::from_str("\"purple_prose\"").unwrap();
        assert_eq!(parsed, Category::Other);
        assert_eq!("nonsense".parse::<Category>(), Ok(Category::Other));
    }

    #[test]
    fn test_category_serializes_snake_case() {
        let json = serde_json::to_string(&Category::ShowVsTell).unwrap();
        assert_eq!(json, "\"show_vs_tell\"");
    }

    #[test]
    fn test_pattern_defaults() {
        let pattern: Pattern = serde_json::from_str("{}").unwrap();
        assert_eq!(pattern.category, Category::Other);
        assert_eq!(pattern.rule, "");
        assert_eq!(pattern.confidence, 0.5);
        assert_eq!(pattern.example(), Example::default());
    }

    #[test]
    fn test_classified_item_index_is_lenient() {
        let items: Vec<ClassifiedItem> = serde_json::from_str(
            r#"[
                {"paragraph_index": 3, "patterns": []},
                {"paragraph_index": "1", "patterns": [{"rule": "Cut filler"}]},
                {"paragraph_index": -1},
                {"paragraph_index": null},
                {}
            ]"#,
        )
        .unwrap();
        let indices: Vec<Option<usize>> = items.iter().map(|i| i.paragraph_index).collect();
        assert_eq!(indices, vec![Some(3), None, None, None, None]);
        assert_eq!(items[1].patterns[0].rule, "Cut filler");
    }

    #[test]
    fn test_profile_decodes_leniently() {
        let profile: Profile =
            serde_json::from_str(r#"{"rules": [{"rule": "Cut filter words"}]}"#).unwrap();
        assert_eq!(profile.chapters_analyzed, 0);
        assert_eq!(profile.rules[0].occurrences, 1);
        assert_eq!(profile.rules[0].category, Category::Other);
        assert!(profile.rules[0].examples.is_empty());
        assert_eq!(profile.rules[0].confidence, None);
    }

    #[test]
    fn test_rules_by_occurrence_is_stable() {
        let mut profile = Profile::blank();
        for (rule, occurrences) in [("first", 2), ("second", 5), ("third", 2)] {
            profile.rules.push(Rule {
                occurrences,
                ..Rule::from_pattern(&Pattern {
                    category: Category::Other,
                    rule: rule.to_string(),
                    confidence: 0.5,
                    example_before: String::new(),
                    example_after: String::new(),
                })
            });
        }
        let order: Vec<&str> = profile
            .rules_by_occurrence()
            .iter()
            .map(|r| r.rule.as_str())
            .collect();
        assert_eq!(order, vec!["second", "first", "third"]);
    }
}
