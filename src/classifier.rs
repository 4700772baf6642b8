//! Edit classification.
//!
//! Defines the [`Classifier`] capability (edit records in, categorized
//! patterns out) and its implementations:
//! - **[`DisabledClassifier`]**: fails on any non-empty batch; used when `classifier.provider = "disabled"`.
//! - **[`AnthropicClassifier`]**: calls the Anthropic Messages API with retry and backoff.
//!
//! The payload and response handling are plain functions so they can be
//! tested without a network:
//! - [`build_user_prompt`]: JSON array of truncated edit records
//! - [`strip_code_fences`]: remove a surrounding Markdown code fence
//! - [`parse_classifier_response`]: strict shape check, then lenient field decoding
//!
//! # Retry Strategy
//!
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use style_editor_core::align::EditRecord;
use style_editor_core::models::{Category, ClassifiedItem};

use crate::config::ClassifierConfig;

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("ANTHROPIC_API_KEY not set. Export it in your environment.")]
    MissingApiKey,

    #[error("Classifier is disabled (classifier.provider = \"disabled\")")]
    Disabled,

    #[error("Classifier request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Classifier API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Classifier returned an empty response")]
    EmptyResponse,

    #[error("Classifier returned invalid JSON: {source}\n--- raw response ---\n{raw}")]
    InvalidJson {
        source: serde_json::Error,
        raw: String,
    },

    #[error("Classifier response must be a JSON array\n--- raw response ---\n{raw}")]
    NotAnArray { raw: String },

    #[error("Classifier response has malformed items: {source}\n--- raw response ---\n{raw}")]
    MalformedItems {
        source: serde_json::Error,
        raw: String,
    },
}

/// Classifies edit records into style patterns.
///
/// Implementations return one [`ClassifiedItem`] per record they could
/// judge; an item may carry zero patterns. An empty input must produce an
/// empty output.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Short identifier for logs (e.g. `"anthropic"`).
    fn name(&self) -> &str;

    async fn classify(&self, records: &[EditRecord]) -> Result<Vec<ClassifiedItem>, ClassifyError>;
}

/// Per-record truncation applied to the classifier payload, in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadLimits {
    pub original_chars: usize,
    pub edited_chars: usize,
    pub diff_chars: usize,
}

impl PayloadLimits {
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self {
            original_chars: config.original_chars,
            edited_chars: config.edited_chars,
            diff_chars: config.diff_chars,
        }
    }
}

impl Default for PayloadLimits {
    fn default() -> Self {
        Self {
            original_chars: 500,
            edited_chars: 500,
            diff_chars: 300,
        }
    }
}

#[derive(Serialize)]
struct PromptRecord {
    paragraph_index: usize,
    original_text: String,
    edited_text: String,
    diff_summary: String,
}

/// Render the user message: a JSON array with one object per record.
pub fn build_user_prompt(records: &[EditRecord], limits: PayloadLimits) -> String {
    let payload: Vec<PromptRecord> = records
        .iter()
        .map(|r| PromptRecord {
            paragraph_index: r.paragraph_index,
            original_text: truncate_chars(&r.original_text, limits.original_chars),
            edited_text: truncate_chars(&r.edited_text, limits.edited_chars),
            diff_summary: truncate_chars(&r.diff_summary, limits.diff_chars),
        })
        .collect();
    serde_json::to_string_pretty(&payload).unwrap_or_else(|_| "[]".to_string())
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// The system prompt, listing the closed category vocabulary.
pub fn system_prompt() -> String {
    let categories = Category::ALL
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "You are a fiction-editing analyst. You receive a JSON array of paragraph edits an \
author made to their own chapter. Each edit has paragraph_index, original_text, edited_text \
(either may be empty for insertions or deletions) and diff_summary.\n\n\
For every edit, identify the reusable style rules it demonstrates. Describe each rule as a \
short imperative that would apply to other chapters, not just this sentence.\n\n\
Respond with ONLY a JSON array, one object per edit:\n\
[{{\"paragraph_index\": 0, \"patterns\": [{{\"category\": \"...\", \"rule\": \"...\", \
\"confidence\": 0.0, \"example_before\": \"...\", \"example_after\": \"...\"}}]}}]\n\n\
category must be one of: {}.\n\
confidence is a number between 0 and 1. example_before and example_after are short excerpts. \
Use an empty patterns list when an edit shows no reusable rule.",
        categories
    )
}

/// Strip a surrounding Markdown code fence (```` ``` ```` or ```` ```json ````).
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening fence line.
    let body = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Parse the classifier's text response.
///
/// The top level must be a JSON array; anything else is an error carrying
/// the raw payload. Item fields are decoded leniently (missing fields take
/// defaults) and confidences are clamped to `[0, 1]`.
pub fn parse_classifier_response(raw: &str) -> Result<Vec<ClassifiedItem>, ClassifyError> {
    let cleaned = strip_code_fences(raw);
    let value: serde_json::Value =
        serde_json::from_str(cleaned).map_err(|source| ClassifyError::InvalidJson {
            source,
            raw: raw.to_string(),
        })?;

    if !value.is_array() {
        return Err(ClassifyError::NotAnArray {
            raw: raw.to_string(),
        });
    }

    let mut items: Vec<ClassifiedItem> =
        serde_json::from_value(value).map_err(|source| ClassifyError::MalformedItems {
            source,
            raw: raw.to_string(),
        })?;

    for pattern in items.iter_mut().flat_map(|item| item.patterns.iter_mut()) {
        pattern.confidence = if pattern.confidence.is_nan() {
            0.0
        } else {
            pattern.confidence.clamp(0.0, 1.0)
        };
    }
    Ok(items)
}

// ============ Disabled Classifier ============

/// A classifier that rejects every non-empty batch.
pub struct DisabledClassifier;

#[async_trait]
impl Classifier for DisabledClassifier {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn classify(&self, records: &[EditRecord]) -> Result<Vec<ClassifiedItem>, ClassifyError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        Err(ClassifyError::Disabled)
    }
}

// ============ Anthropic Classifier ============

/// Classifier backed by the Anthropic Messages API.
///
/// Requires the `ANTHROPIC_API_KEY` environment variable.
pub struct AnthropicClassifier {
    config: ClassifierConfig,
    api_key: String,
    client: reqwest::Client,
}

impl AnthropicClassifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self, ClassifyError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ClassifyError::MissingApiKey)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config: config.clone(),
            api_key,
            client,
        })
    }

    async fn send_with_retry(&self, body: &serde_json::Value) -> Result<serde_json::Value, ClassifyError> {
        let mut last_err = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s, 8s, ...
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tracing::warn!(attempt, delay_secs = delay.as_secs(), "retrying classifier request");
                tokio::time::sleep(delay).await;
            }

            let resp = self
                .client
                .post(&self.config.api_url)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(body)
                .send()
                .await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return Ok(response.json().await?);
                    }

                    let body_text = response.text().await.unwrap_or_default();
                    let err = ClassifyError::Api {
                        status: status.as_u16(),
                        body: body_text,
                    };

                    // Rate limited or server error: retry
                    if status.as_u16() == 429 || status.is_server_error() {
                        last_err = Some(err);
                        continue;
                    }

                    return Err(err);
                }
                Err(e) => {
                    last_err = Some(e.into());
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or(ClassifyError::EmptyResponse))
    }
}

#[async_trait]
impl Classifier for AnthropicClassifier {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn classify(&self, records: &[EditRecord]) -> Result<Vec<ClassifiedItem>, ClassifyError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "system": system_prompt(),
            "messages": [{
                "role": "user",
                "content": build_user_prompt(records, PayloadLimits::from_config(&self.config)),
            }],
        });

        tracing::info!(
            records = records.len(),
            model = %self.config.model,
            "sending edits to classifier"
        );
        let json = self.send_with_retry(&body).await?;
        let text = response_text(&json).ok_or(ClassifyError::EmptyResponse)?;
        parse_classifier_response(text)
    }
}

/// First text block of a Messages API response.
fn response_text(json: &serde_json::Value) -> Option<&str> {
    json.get("content")?
        .as_array()?
        .iter()
        .find(|block| block.get("type").and_then(|t| t.as_str()) == Some("text"))?
        .get("text")?
        .as_str()
        .filter(|t| !t.trim().is_empty())
}

/// Create the [`Classifier`] selected by `config.provider`.
///
/// | Config Value | Classifier |
/// |-------------|------------|
/// | `"disabled"` | [`DisabledClassifier`] |
/// | `"anthropic"` | [`AnthropicClassifier`] |
pub fn create_classifier(config: &ClassifierConfig) -> anyhow::Result<Box<dyn Classifier>> {
    match config.provider.as_str() {
        "disabled" => Ok(Box::new(DisabledClassifier)),
        "anthropic" => Ok(Box::new(AnthropicClassifier::new(config)?)),
        other => anyhow::bail!("Unknown classifier provider: {}", other),
    }
}
