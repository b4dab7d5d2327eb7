//! Inference backend abstraction.
//!
//! `InferenceClient` is an enum over concrete backends. The relay holds one
//! instance for the life of the process and clones it into request handlers;
//! every backend is an immutable, cheaply clonable capability.
//!
//! Every call is one outbound request and one response. Nothing is retried.

pub mod providers;
pub mod types;

use serde_json::Value;
use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum InferenceError {
    /// Transport-level failure: connection refused, DNS, timeout.
    #[error("inference request failed: {0}")]
    Request(String),
    /// The endpoint answered with a non-2xx status.
    #[error("inference endpoint returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },
    /// The endpoint answered 2xx but the body was not JSON.
    #[error("failed to decode inference response: {0}")]
    Decode(String),
}

// ── Client enum ───────────────────────────────────────────────────────────────

/// All available inference backends.
#[derive(Debug, Clone)]
pub enum InferenceClient {
    Hosted(providers::hosted::HostedProvider),
    Dummy(providers::dummy::DummyProvider),
}

impl InferenceClient {
    /// Classify one text. Returns the endpoint's JSON unchanged.
    pub async fn sentiment(&self, text: &str) -> Result<Value, InferenceError> {
        match self {
            InferenceClient::Hosted(p) => p.sentiment(text).await,
            InferenceClient::Dummy(p) => p.sentiment(text).await,
        }
    }

    /// Classify several texts in one request. Returns the endpoint's JSON unchanged.
    pub async fn sentiment_batch(
        &self,
        texts: &[String],
        wait_for_model: bool,
    ) -> Result<Value, InferenceError> {
        match self {
            InferenceClient::Hosted(p) => p.sentiment_batch(texts, wait_for_model).await,
            InferenceClient::Dummy(p) => p.sentiment_batch(texts, wait_for_model).await,
        }
    }

    /// Extract entity mentions from one text. Returns the endpoint's JSON unchanged.
    pub async fn entities(&self, text: &str) -> Result<Value, InferenceError> {
        match self {
            InferenceClient::Hosted(p) => p.entities(text).await,
            InferenceClient::Dummy(p) => p.entities(text).await,
        }
    }

    /// Startup credential/model check.
    pub async fn ping(&self) -> Result<(), InferenceError> {
        match self {
            InferenceClient::Hosted(p) => p.ping().await,
            InferenceClient::Dummy(_) => Ok(()),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            InferenceClient::Hosted(_) => "hosted",
            InferenceClient::Dummy(_) => "dummy",
        }
    }
}
