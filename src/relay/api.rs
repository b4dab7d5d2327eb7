//! Axum handlers for the relay's `/api/*` routes.
//!
//! Analysis handlers return the backend's JSON verbatim on success. Backend
//! failures are translated by [`inference_error`]; an upstream HTTP error
//! keeps its status code.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::RelayState;
use crate::inference::InferenceError;

// ── Request types ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct TextRequest {
    text: String,
}

#[derive(Deserialize)]
pub(super) struct BatchRequest {
    texts: Vec<String>,
    #[serde(default = "default_wait_for_model")]
    wait_for_model: bool,
}

fn default_wait_for_model() -> bool {
    true
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a JSON error response body.
fn json_error(code: &str, msg: impl std::fmt::Display) -> Json<Value> {
    Json(json!({ "error": code, "message": format!("{msg}") }))
}

fn invalid_input(msg: &str) -> Response {
    (StatusCode::BAD_REQUEST, json_error("invalid_input", msg)).into_response()
}

fn model_unavailable() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        json_error("model_unavailable", "Model is not available."),
    )
        .into_response()
}

/// Map a backend failure onto an HTTP response.
pub(super) fn inference_error(e: InferenceError) -> Response {
    match e {
        InferenceError::Upstream { status, body } => {
            let code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            (code, Json(json!({ "error": "upstream", "status": status, "body": body }))).into_response()
        }
        InferenceError::Request(msg) => {
            (StatusCode::BAD_GATEWAY, json_error("connectivity", msg)).into_response()
        }
        InferenceError::Decode(msg) => {
            (StatusCode::BAD_GATEWAY, json_error("decode", msg)).into_response()
        }
    }
}

fn relay_result(route: &str, result: Result<Value, InferenceError>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => {
            warn!(%route, error = %e, "inference call failed");
            inference_error(e)
        }
    }
}

fn health_body(ready: bool) -> Json<Value> {
    Json(json!({ "status": "ok", "model_ready": ready }))
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// GET /api/health
pub(super) async fn health(State(state): State<RelayState>) -> Json<Value> {
    health_body(state.is_ready())
}

/// POST /api/health/refresh — rerun the credential/model check.
pub(super) async fn health_refresh(State(state): State<RelayState>) -> Json<Value> {
    health_body(state.check_model().await)
}

/// POST /api/analyze-sentiment
pub(super) async fn analyze_sentiment(
    State(state): State<RelayState>,
    Json(req): Json<TextRequest>,
) -> Response {
    if req.text.trim().is_empty() {
        return invalid_input("text must not be empty");
    }
    if !state.is_ready() {
        return model_unavailable();
    }
    debug!(text_len = req.text.len(), "analyze-sentiment");
    relay_result("analyze-sentiment", state.inference.sentiment(&req.text).await)
}

/// POST /api/analyze-sentiment/batch
pub(super) async fn analyze_sentiment_batch(
    State(state): State<RelayState>,
    Json(req): Json<BatchRequest>,
) -> Response {
    if req.texts.is_empty() {
        return invalid_input("texts must not be empty");
    }
    if req.texts.iter().any(|t| t.trim().is_empty()) {
        return invalid_input("texts must not contain blank entries");
    }
    if !state.is_ready() {
        return model_unavailable();
    }
    debug!(batch = req.texts.len(), wait_for_model = req.wait_for_model, "analyze-sentiment/batch");
    relay_result(
        "analyze-sentiment/batch",
        state.inference.sentiment_batch(&req.texts, req.wait_for_model).await,
    )
}

/// POST /api/extract-entities
pub(super) async fn extract_entities(
    State(state): State<RelayState>,
    Json(req): Json<TextRequest>,
) -> Response {
    if req.text.trim().is_empty() {
        return invalid_input("text must not be empty");
    }
    if !state.is_ready() {
        return model_unavailable();
    }
    debug!(text_len = req.text.len(), "extract-entities");
    relay_result("extract-entities", state.inference.entities(&req.text).await)
}
