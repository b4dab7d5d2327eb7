//! HTTP client for the relay, used by the presentation layer.
//!
//! Responses are decoded into the typed records in
//! [`crate::inference::types`] here, at the boundary.

use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, error};

use crate::inference::types::{EntityMention, HealthStatus, SentimentOutput};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Could not reach the API. Details: {0}")]
    Connectivity(String),
    #[error("Error from API: {status} - {body}")]
    Upstream { status: u16, body: String },
    #[error("Unexpected response from API: {0}")]
    Decode(String),
}

#[derive(Serialize)]
struct TextRequest<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct BatchRequest<'a> {
    texts: &'a [String],
    wait_for_model: bool,
}

/// Cheap to clone: `reqwest::Client` is `Arc`-backed.
#[derive(Debug, Clone)]
pub struct RelayClient {
    base_url: String,
    client: Client,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let url = format!("{}/api/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| connectivity(&url, e))?;
        decode(&url, response).await
    }

    pub async fn sentiment(&self, text: &str) -> Result<SentimentOutput, ClientError> {
        // Single-text endpoint answers `[[{label, score}, …]]` or `[{label, score}]`.
        let outputs: Vec<SentimentOutput> =
            self.post("/api/analyze-sentiment", &TextRequest { text }).await?;

        let mut singles = Vec::new();
        for output in outputs {
            match output {
                SentimentOutput::Ranked(list) => return Ok(SentimentOutput::Ranked(list)),
                SentimentOutput::Single(s) => singles.push(s),
            }
        }
        if singles.is_empty() {
            return Err(ClientError::Decode("empty sentiment response".into()));
        }
        Ok(SentimentOutput::Ranked(singles))
    }

    pub async fn sentiment_batch(
        &self,
        texts: &[String],
        wait_for_model: bool,
    ) -> Result<Vec<SentimentOutput>, ClientError> {
        self.post("/api/analyze-sentiment/batch", &BatchRequest { texts, wait_for_model })
            .await
    }

    pub async fn entities(&self, text: &str) -> Result<Vec<EntityMention>, ClientError> {
        self.post("/api/extract-entities", &TextRequest { text }).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "calling relay");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| connectivity(&url, e))?;
        decode(&url, response).await
    }
}

fn connectivity(url: &str, e: reqwest::Error) -> ClientError {
    error!(%url, error = %e, "relay unreachable");
    ClientError::Connectivity(e.to_string())
}

async fn decode<T: DeserializeOwned>(url: &str, response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| connectivity(url, e))?;

    if !status.is_success() {
        error!(%url, %status, "relay returned HTTP error");
        return Err(ClientError::Upstream { status: status.as_u16(), body });
    }

    serde_json::from_str(&body).map_err(|e| {
        error!(%url, error = %e, "relay response did not match expected shape");
        ClientError::Decode(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let c = RelayClient::new("http://localhost:8000/");
        assert_eq!(c.base_url(), "http://localhost:8000");
    }

    #[test]
    fn upstream_error_message_shape() {
        let e = ClientError::Upstream { status: 500, body: "boom".into() };
        assert_eq!(e.to_string(), "Error from API: 500 - boom");
    }

    #[tokio::test]
    async fn unreachable_relay_is_connectivity_error() {
        let c = RelayClient::new("http://127.0.0.1:9");
        let err = c.entities("Apple").await.unwrap_err();
        assert!(matches!(err, ClientError::Connectivity(_)));
        assert!(err.to_string().starts_with("Could not reach the API"));
    }
}
