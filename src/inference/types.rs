//! Typed records for the inference responses the presentation layer consumes.
//!
//! The relay never decodes into these; it passes JSON through. The
//! presentation layer decodes at its boundary so that a malformed upstream
//! body is a typed error instead of a missing-key surprise while rendering.

use serde::{Deserialize, Serialize};

/// One `{label, score}` verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub label: String,
    pub score: f64,
}

/// Per-input sentiment output: either a ranked list of verdicts (one per
/// label) or a single verdict, depending on the model and endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SentimentOutput {
    Ranked(Vec<SentimentScore>),
    Single(SentimentScore),
}

impl SentimentOutput {
    /// Highest-scoring verdict, `None` for an empty ranked list.
    pub fn top(&self) -> Option<&SentimentScore> {
        match self {
            SentimentOutput::Single(s) => Some(s),
            SentimentOutput::Ranked(list) => list
                .iter()
                .max_by(|a, b| a.score.total_cmp(&b.score)),
        }
    }
}

/// One NER mention. Aggregated models tag with `entity_group`; raw token
/// classifiers tag with `entity` (`B-ORG`, `I-PER`, …).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMention {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
}

impl EntityMention {
    pub fn new(tag: &str, word: &str) -> Self {
        Self {
            entity_group: Some(tag.to_string()),
            entity: None,
            word: word.to_string(),
            score: None,
            start: None,
            end: None,
        }
    }

    /// Grouping tag. `B-`/`I-` prefixes of raw tags are stripped so both
    /// halves of a span land in the same group.
    pub fn tag(&self) -> &str {
        if let Some(group) = self.entity_group.as_deref() {
            return group;
        }
        match self.entity.as_deref() {
            Some(raw) => raw
                .strip_prefix("B-")
                .or_else(|| raw.strip_prefix("I-"))
                .unwrap_or(raw),
            None => "MISC",
        }
    }
}

/// `GET /api/health` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_ready: bool,
}
