//! Hosted inference endpoint (`POST <api_base_url>/<model_id>`).
//!
//! Wire shape: `{"inputs": <string | [string]>, "options": {"wait_for_model": bool}}`
//! with `Authorization: Bearer <token>`. Response bodies are returned to the
//! caller as parsed but otherwise untouched JSON.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, trace};

use crate::inference::InferenceError;

/// Adapter for the hosted sentiment and NER models.
///
/// Constructed once at startup, then cheaply cloned because
/// `reqwest::Client` is an `Arc` internally.
#[derive(Debug, Clone)]
pub struct HostedProvider {
    client: Client,
    api_base_url: String,
    sentiment_model: String,
    ner_model: String,
    wait_for_model: bool,
    api_token: String,
}

impl HostedProvider {
    /// `timeout` of `None` leaves reqwest's default in place.
    pub fn new(
        api_base_url: String,
        sentiment_model: String,
        ner_model: String,
        wait_for_model: bool,
        timeout: Option<Duration>,
        api_token: String,
    ) -> Result<Self, InferenceError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| InferenceError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            sentiment_model,
            ner_model,
            wait_for_model,
            api_token,
        })
    }

    pub fn sentiment_url(&self) -> String {
        model_url(&self.api_base_url, &self.sentiment_model)
    }

    pub fn ner_url(&self) -> String {
        model_url(&self.api_base_url, &self.ner_model)
    }

    pub async fn sentiment(&self, text: &str) -> Result<Value, InferenceError> {
        let payload = InferenceRequest::new(Inputs::One(text), self.wait_for_model);
        self.post(&self.sentiment_url(), &payload).await
    }

    pub async fn sentiment_batch(
        &self,
        texts: &[String],
        wait_for_model: bool,
    ) -> Result<Value, InferenceError> {
        let payload = InferenceRequest::new(Inputs::Many(texts), wait_for_model);
        self.post(&self.sentiment_url(), &payload).await
    }

    pub async fn entities(&self, text: &str) -> Result<Value, InferenceError> {
        let payload = InferenceRequest::new(Inputs::One(text), self.wait_for_model);
        self.post(&self.ner_url(), &payload).await
    }

    /// Credential/model reachability check.
    ///
    /// HEAD on both model endpoints with the bearer credential. A 2xx answer
    /// counts as ready, and so does 405 from endpoints that only route POST.
    /// Anything else (credential rejected, unknown model, server error) or a
    /// transport failure is not ready. Uses a hard 5 s timeout.
    pub async fn ping(&self) -> Result<(), InferenceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| InferenceError::Request(format!("failed to build ping client: {e}")))?;

        for url in [self.sentiment_url(), self.ner_url()] {
            let response = client
                .head(&url)
                .bearer_auth(&self.api_token)
                .send()
                .await
                .map_err(|e| InferenceError::Request(format!("unreachable: {e}")))?;

            let status = response.status();
            if !check_passed(status) {
                return Err(InferenceError::Upstream {
                    status: status.as_u16(),
                    body: format!("model check failed for {url}"),
                });
            }
            debug!(%url, %status, "model check passed");
        }
        Ok(())
    }

    async fn post(&self, url: &str, payload: &InferenceRequest<'_>) -> Result<Value, InferenceError> {
        debug!(%url, inputs = payload.inputs.len(), "sending inference request");
        if tracing::enabled!(tracing::Level::TRACE) {
            let json = serde_json::to_string(payload)
                .unwrap_or_else(|e| format!("<serialization failed: {e}>"));
            trace!(payload = %json, "full inference request payload");
        }

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_token)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                error!(%url, error = %e, is_timeout = e.is_timeout(), "inference request failed (transport)");
                InferenceError::Request(e.to_string())
            })?;

        let response = check_status(response).await?;

        let body = response.json::<Value>().await.map_err(|e| {
            error!(%url, error = %e, "failed to decode inference response");
            InferenceError::Decode(e.to_string())
        })?;

        trace!(response = %body, "full inference response payload");
        Ok(body)
    }
}

fn check_passed(status: StatusCode) -> bool {
    status.is_success() || status == StatusCode::METHOD_NOT_ALLOWED
}

fn model_url(base: &str, model: &str) -> String {
    format!("{base}/{}", model.trim_start_matches('/'))
}

// ── Private wire types ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: Inputs<'a>,
    options: InferenceOptions,
}

impl<'a> InferenceRequest<'a> {
    fn new(inputs: Inputs<'a>, wait_for_model: bool) -> Self {
        Self { inputs, options: InferenceOptions { wait_for_model } }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Inputs<'a> {
    One(&'a str),
    Many(&'a [String]),
}

impl Inputs<'_> {
    fn len(&self) -> usize {
        match self {
            Inputs::One(_) => 1,
            Inputs::Many(texts) => texts.len(),
        }
    }
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

/// Return the response if successful, or `Upstream { status, body }`.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, InferenceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_string());

    error!(%status, %body, "inference endpoint returned HTTP error");
    Err(InferenceError::Upstream { status: status.as_u16(), body })
}
