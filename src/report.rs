//! Human-readable rendering for `sted profile` and `sted diff`.
//!
//! The `format_*` functions build the full text so they can be tested
//! without capturing stdout; the `run_*` entry points print it.

use anyhow::{Context, Result};
use std::fmt::Write;
use std::path::Path;

use style_editor_core::align::{align, EditRecord};
use style_editor_core::models::Profile;

use crate::config::Config;
use crate::store;

/// Examples shown per rule, most recent last.
const EXAMPLES_SHOWN: usize = 3;

pub const EMPTY_PROFILE_MESSAGE: &str = "No profile yet. Run `sted learn` first.";

/// Render a non-empty profile, rules ordered by descending occurrences.
pub fn format_profile(profile: &Profile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Chapters analyzed: {}", profile.chapters_analyzed);
    let _ = writeln!(out, "Rules: {}", profile.rules.len());

    for rule in profile.rules_by_occurrence() {
        let _ = writeln!(out);
        let _ = writeln!(out, "[{}] {}", rule.category, rule.rule);
        let confidence = match rule.confidence {
            Some(c) => format!("{:.2}", c),
            None => "n/a".to_string(),
        };
        let _ = writeln!(
            out,
            "  occurrences: {}  confidence: {}",
            rule.occurrences, confidence
        );
        let skip = rule.examples.len().saturating_sub(EXAMPLES_SHOWN);
        for example in rule.examples.iter().skip(skip) {
            let _ = writeln!(out, "  - before: {}", one_line(&example.before));
            let _ = writeln!(out, "    after:  {}", one_line(&example.after));
        }
    }
    out
}

/// Collapse line breaks so an excerpt fits on one line.
fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// CLI entry point for `sted profile`.
pub fn run_profile(config: &Config, json: bool) -> Result<()> {
    let profile = store::load_profile(&config.profile.path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    if profile.is_empty() {
        println!("{}", EMPTY_PROFILE_MESSAGE);
        return Ok(());
    }
    print!("{}", format_profile(&profile));
    Ok(())
}

/// Render edit records as labelled blocks.
pub fn format_edits(edits: &[EditRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} changed paragraph(s)", edits.len());

    for edit in edits {
        let kind = if edit.is_insertion() {
            "inserted"
        } else if edit.is_deletion() {
            "deleted"
        } else {
            "changed"
        };
        let _ = writeln!(out);
        let _ = writeln!(out, "--- paragraph {} ({}) ---", edit.paragraph_index, kind);
        let _ = writeln!(out, "{}", edit.diff_summary);
    }
    out
}

/// CLI entry point for `sted diff`.
pub fn run_diff(original_path: &Path, edited_path: &Path, json: bool) -> Result<()> {
    let original = std::fs::read_to_string(original_path)
        .with_context(|| format!("Failed to read {}", original_path.display()))?;
    let edited = std::fs::read_to_string(edited_path)
        .with_context(|| format!("Failed to read {}", edited_path.display()))?;

    let edits = align(&original, &edited);

    if json {
        println!("{}", serde_json::to_string_pretty(&edits)?);
        return Ok(());
    }

    if edits.is_empty() {
        println!("No differences found between the two files.");
        return Ok(());
    }
    print!("{}", format_edits(&edits));
    Ok(())
}
