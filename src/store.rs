//! Style profile persistence.
//!
//! The profile lives in a single pretty-printed JSON file. Saves are atomic
//! whole-file rewrites: the new content is written to a sibling temp file
//! and renamed over the target, so a crash mid-write never leaves a
//! truncated profile behind.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use style_editor_core::models::Profile;

/// Load the profile at `path`, or a blank profile when none exists yet.
pub fn load_profile(path: &Path) -> Result<Profile> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no profile on disk, starting blank");
        return Ok(Profile::blank());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile: {}", path.display()))?;
    let profile: Profile = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse profile: {}", path.display()))?;
    Ok(profile)
}

/// Atomically write `profile` to `path`, creating parent directories.
pub fn save_profile(profile: &Profile, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    let json = serde_json::to_string_pretty(profile)?;
    let tmp = temp_path(path);
    std::fs::write(&tmp, json.as_bytes())
        .with_context(|| format!("Failed to write profile: {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace profile: {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        rules = profile.rules.len(),
        "profile saved"
    );
    Ok(())
}

/// Delete the profile at `path`. Returns whether a file was removed.
pub fn reset_profile(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_file(path)
        .with_context(|| format!("Failed to delete profile: {}", path.display()))?;
    Ok(true)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "style_profile.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use style_editor_core::models::{Category, Example, Rule};
    use tempfile::TempDir;

    fn sample_profile() -> Profile {
        Profile {
            rules: vec![Rule {
                category: Category::DialogueAdjustment,
                rule: "Let dialogue carry the beat — no tags".to_string(),
                occurrences: 3,
                confidence: Some(0.867),
                examples: vec![Example {
                    before: "\"Go,\" he said angrily.".to_string(),
                    after: "\"Go.\"".to_string(),
                }],
            }],
            chapters_analyzed: 2,
        }
    }

    #[test]
    fn test_missing_profile_is_blank() {
        let tmp = TempDir::new().unwrap();
        let profile = load_profile(&tmp.path().join("nope.json")).unwrap();
        assert_eq!(profile, Profile::blank());
    }

    #[test]
    fn test_save_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("dir").join("style_profile.json");
        let profile = sample_profile();

        save_profile(&profile, &path).unwrap();
        assert!(path.exists());
        assert!(!temp_path(&path).exists());
        assert_eq!(load_profile(&path).unwrap(), profile);
    }

    #[test]
    fn test_save_keeps_non_ascii_and_indents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("style_profile.json");
        save_profile(&sample_profile(), &path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("—"));
        assert!(raw.contains("\n  \"rules\""));
        assert!(raw.contains("\"chapters_analyzed\": 2"));
    }

    #[test]
    fn test_save_overwrites() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("style_profile.json");
        save_profile(&sample_profile(), &path).unwrap();
        save_profile(&Profile::blank(), &path).unwrap();
        assert_eq!(load_profile(&path).unwrap(), Profile::blank());
    }

    #[test]
    fn test_corrupt_profile_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("style_profile.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_profile(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse profile"));
    }

    #[test]
    fn test_reset() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("style_profile.json");
        assert!(!reset_profile(&path).unwrap());

        save_profile(&sample_profile(), &path).unwrap();
        assert!(reset_profile(&path).unwrap());
        assert!(!path.exists());
    }
}
