//! The learn pipeline.
//!
//! ```text
//! original + edited ──▶ align ──▶ classify ──▶ merge ──▶ save
//! ```
//!
//! Identical documents stop after alignment: the classifier is never
//! called and the profile is left untouched (its `chapters_analyzed`
//! counter included). Any classifier failure aborts the run before the
//! profile is modified.

use anyhow::{Context, Result};
use std::path::Path;

use style_editor_core::align::{align, EditRecord};
use style_editor_core::merge::{merge_patterns, MergeSummary};
use style_editor_core::models::Profile;

use crate::classifier::{create_classifier, Classifier};
use crate::config::Config;
use crate::history;
use crate::store;

/// What a single learn run did to the profile.
#[derive(Debug, Clone, PartialEq)]
pub enum LearnOutcome {
    /// The documents had no paragraph-level differences.
    NoDifferences,
    /// Edits were classified and merged.
    Learned {
        edits: Vec<EditRecord>,
        summary: MergeSummary,
    },
}

/// Align, classify and merge one pair of documents into `profile`.
///
/// `profile` is only mutated once classification has succeeded.
pub async fn learn_documents(
    original: &str,
    edited: &str,
    classifier: &dyn Classifier,
    profile: &mut Profile,
    threshold: f64,
) -> Result<LearnOutcome> {
    learn_edits(align(original, edited), classifier, profile, threshold).await
}

/// Classify already-aligned `edits` and merge the result into `profile`.
pub async fn learn_edits(
    edits: Vec<EditRecord>,
    classifier: &dyn Classifier,
    profile: &mut Profile,
    threshold: f64,
) -> Result<LearnOutcome> {
    if edits.is_empty() {
        return Ok(LearnOutcome::NoDifferences);
    }
    tracing::debug!(edits = edits.len(), "paragraphs aligned");

    let items = classifier
        .classify(&edits)
        .await
        .with_context(|| format!("Classification failed ({})", classifier.name()))?;

    let summary = merge_patterns(profile, &items, threshold);
    tracing::info!(
        patterns = summary.patterns,
        created = summary.rules_created,
        reinforced = summary.rules_reinforced,
        "patterns merged"
    );
    Ok(LearnOutcome::Learned { edits, summary })
}

fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// CLI entry point for `sted learn`.
pub async fn run_learn(
    config: &Config,
    original_path: &Path,
    edited_path: &Path,
    archive: bool,
    dry_run: bool,
) -> Result<()> {
    let original = read_document(original_path)?;
    let edited = read_document(edited_path)?;

    let edits = align(&original, &edited);
    if edits.is_empty() {
        println!("No differences found between the two files.");
        return Ok(());
    }
    println!("Found {} changed paragraph(s).", edits.len());

    // The classifier is built lazily so a run with nothing to learn never
    // needs credentials.
    let classifier = create_classifier(&config.classifier)?;
    let mut profile = store::load_profile(&config.profile.path)?;

    let outcome = learn_edits(
        edits,
        classifier.as_ref(),
        &mut profile,
        config.matching.threshold,
    )
    .await?;

    let summary = match outcome {
        LearnOutcome::Learned { summary, .. } => summary,
        LearnOutcome::NoDifferences => return Ok(()),
    };

    println!("Extracted {} pattern(s)", summary.patterns);
    println!(
        "Profile updated: {} rule(s) ({} new, {} reinforced), chapters analyzed: {}",
        profile.rules.len(),
        summary.rules_created,
        summary.rules_reinforced,
        profile.chapters_analyzed
    );

    if dry_run {
        println!("Dry run: profile not saved.");
        return Ok(());
    }

    store::save_profile(&profile, &config.profile.path)?;
    println!("Saved to {}", config.profile.path.display());

    if archive {
        let folder = history::archive_session(
            &config.history.dir,
            "learn",
            &[("original", original_path), ("edited", edited_path)],
        )?;
        println!("Archived to {}", folder.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::DisabledClassifier;

    #[tokio::test]
    async fn test_identical_documents_skip_classifier() {
        let mut profile = Profile::blank();
        let outcome = learn_documents(
            "One.\n\nTwo.",
            "One.\n\nTwo.",
            &DisabledClassifier,
            &mut profile,
            0.4,
        )
        .await
        .unwrap();
        assert_eq!(outcome, LearnOutcome::NoDifferences);
        assert_eq!(profile.chapters_analyzed, 0);
    }

    #[tokio::test]
    async fn test_classifier_failure_leaves_profile_alone() {
        let mut profile = Profile::blank();
        let err = learn_documents("One.", "Uno.", &DisabledClassifier, &mut profile, 0.4)
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("disabled"));
        assert_eq!(profile, Profile::blank());
    }
}
