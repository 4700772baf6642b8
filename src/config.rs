//! TOML configuration.
//!
//! Every section and key is optional. A missing config file yields
//! [`Config::default`]; a present file is parsed and validated by
//! [`load_config`]. See `config/sted.example.toml` for all keys.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use style_editor_core::keywords::DEFAULT_MATCH_THRESHOLD;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProfileConfig {
    #[serde(default = "default_profile_path")]
    pub path: PathBuf,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            path: default_profile_path(),
        }
    }
}

fn default_profile_path() -> PathBuf {
    PathBuf::from("./output/style_profile.json")
}

#[derive(Debug, Deserialize, Clone)]
pub struct MatchingConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

fn default_threshold() -> f64 {
    DEFAULT_MATCH_THRESHOLD
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClassifierConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_original_chars")]
    pub original_chars: usize,
    #[serde(default = "default_edited_chars")]
    pub edited_chars: usize,
    #[serde(default = "default_diff_chars")]
    pub diff_chars: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            api_url: default_api_url(),
            original_chars: default_original_chars(),
            edited_chars: default_edited_chars(),
            diff_chars: default_diff_chars(),
        }
    }
}

fn default_provider() -> String {
    "anthropic".to_string()
}
fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}
fn default_max_tokens() -> u32 {
    4096
}
fn default_timeout_secs() -> u64 {
    120
}
fn default_max_retries() -> u32 {
    3
}
fn default_api_url() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}
fn default_original_chars() -> usize {
    500
}
fn default_edited_chars() -> usize {
    500
}
fn default_diff_chars() -> usize {
    300
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    #[serde(default = "default_history_dir")]
    pub dir: PathBuf,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            dir: default_history_dir(),
        }
    }
}

fn default_history_dir() -> PathBuf {
    PathBuf::from("./history")
}

/// Load the config at `path`, falling back to defaults when it does not exist.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        Ok(Config::default())
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    let threshold = config.matching.threshold;
    if !(threshold > 0.0 && threshold <= 1.0) {
        anyhow::bail!("matching.threshold must be in (0.0, 1.0], got {}", threshold);
    }

    let classifier = &config.classifier;
    match classifier.provider.as_str() {
        "disabled" | "anthropic" => {}
        other => anyhow::bail!(
            "Unknown classifier provider: '{}'. Must be disabled or anthropic.",
            other
        ),
    }

    if classifier.max_tokens == 0 {
        anyhow::bail!("classifier.max_tokens must be > 0");
    }

    if classifier.original_chars == 0 || classifier.edited_chars == 0 || classifier.diff_chars == 0
    {
        anyhow::bail!("classifier truncation limits (original_chars, edited_chars, diff_chars) must be > 0");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(content: &str) -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sted.toml");
        fs::write(&path, content).unwrap();
        (tmp, path)
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let cfg = load_or_default(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.matching.threshold, 0.4);
        assert_eq!(cfg.classifier.provider, "anthropic");
        assert_eq!(cfg.classifier.original_chars, 500);
        assert_eq!(cfg.classifier.edited_chars, 500);
        assert_eq!(cfg.classifier.diff_chars, 300);
    }

    #[test]
    fn test_partial_config() {
        let (_tmp, path) = write_config(
            r#"
[profile]
path = "/tmp/profile.json"

[classifier]
provider = "disabled"
"#,
        );
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.profile.path, PathBuf::from("/tmp/profile.json"));
        assert_eq!(cfg.classifier.provider, "disabled");
        assert_eq!(cfg.classifier.max_retries, 3);
        assert_eq!(cfg.history.dir, PathBuf::from("./history"));
    }

    #[test]
    fn test_truncation_limits_are_independent() {
        let (_tmp, path) = write_config("[classifier]\noriginal_chars = 200\n");
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.classifier.original_chars, 200);
        assert_eq!(cfg.classifier.edited_chars, 500);
        assert_eq!(cfg.classifier.diff_chars, 300);
    }

    #[test]
    fn test_rejects_bad_threshold() {
        let (_tmp, path) = write_config("[matching]\nthreshold = 0.0\n");
        assert!(load_config(&path).is_err());

        let (_tmp, path) = write_config("[matching]\nthreshold = 1.5\n");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_rejects_unknown_provider() {
        let (_tmp, path) = write_config("[classifier]\nprovider = \"openai\"\n");
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("Unknown classifier provider"));
    }

    #[test]
    fn test_rejects_invalid_toml() {
        let (_tmp, path) = write_config("[profile\npath = 3");
        assert!(load_config(&path).is_err());
    }
}
