//! Shared helpers: a scriptable fake inference endpoint and relay wiring.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU16, Ordering},
};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use finsent::config::{Backend, Config, InferenceConfig, RelayConfig, UiConfig};
use finsent::relay::Relay;

pub const SENTIMENT_MODEL: &str = "acme/finbert";
pub const NER_MODEL: &str = "acme/ner";
pub const TOKEN: &str = "hf_integration";

/// One request as seen by the fake endpoint.
#[derive(Debug, Clone)]
pub struct Seen {
    pub model: String,
    pub authorization: Option<String>,
    pub body: Value,
}

/// How the fake endpoint answers.
#[derive(Debug, Clone)]
pub enum Script {
    /// Answer every request with this JSON.
    Fixed(Value),
    /// Fail every request with this status and body.
    Fail(u16, String),
    /// Sentiment batches get at most `max_results` entries; NER knows a few
    /// sub-tokenised company names.
    Headlines { max_results: usize },
}

#[derive(Clone)]
struct FakeState {
    script: Script,
    seen: Arc<Mutex<Vec<Seen>>>,
    head_status: Arc<AtomicU16>,
}

pub struct FakeUpstream {
    pub addr: SocketAddr,
    pub seen: Arc<Mutex<Vec<Seen>>>,
    head_status: Arc<AtomicU16>,
}

impl FakeUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}/models", self.addr)
    }

    /// Status answered to HEAD on any model path (200 until changed).
    pub fn set_head_status(&self, status: u16) {
        self.head_status.store(status, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

pub async fn spawn_upstream(script: Script) -> FakeUpstream {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let head_status = Arc::new(AtomicU16::new(200));
    let state = FakeState { script, seen: seen.clone(), head_status: head_status.clone() };
    let router = Router::new()
        .route("/models/{*model}", post(infer).head(model_head))
        .with_state(state);
    FakeUpstream { addr: serve(router).await, seen, head_status }
}

async fn model_head(State(state): State<FakeState>) -> StatusCode {
    StatusCode::from_u16(state.head_status.load(Ordering::SeqCst)).unwrap()
}

async fn infer(
    State(state): State<FakeState>,
    Path(model): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.seen.lock().unwrap().push(Seen {
        model: model.clone(),
        authorization,
        body: body.clone(),
    });

    match &state.script {
        Script::Fixed(v) => Json(v.clone()).into_response(),
        Script::Fail(status, msg) => {
            (StatusCode::from_u16(*status).unwrap(), msg.clone()).into_response()
        }
        Script::Headlines { max_results } => {
            if model == NER_MODEL {
                Json(ner_for(body["inputs"].as_str().unwrap_or_default())).into_response()
            } else {
                let n = body["inputs"].as_array().map(Vec::len).unwrap_or(1);
                let results: Vec<Value> = (0..n.min(*max_results))
                    .map(|i| {
                        let label = ["positive", "negative", "neutral"][i % 3];
                        json!([
                            { "label": label, "score": 0.9 },
                            { "label": "neutral", "score": 0.05 }
                        ])
                    })
                    .collect();
                Json(Value::Array(results)).into_response()
            }
        }
    }
}

fn ner_for(text: &str) -> Value {
    let mut mentions = Vec::new();
    if text.contains("Goldman") {
        mentions.extend([
            json!({ "entity_group": "ORG", "word": "Gold", "score": 0.99, "start": 0, "end": 4 }),
            json!({ "entity_group": "ORG", "word": "##man", "score": 0.99, "start": 4, "end": 7 }),
            json!({ "entity_group": "ORG", "word": "##Sachs", "score": 0.98, "start": 8, "end": 13 }),
        ]);
    }
    if text.contains("Tim Cook") {
        mentions.extend([
            json!({ "entity_group": "PER", "word": "Tim", "score": 0.99 }),
            json!({ "entity_group": "PER", "word": "Cook", "score": 0.99 }),
        ]);
    }
    Value::Array(mentions)
}

/// Offline config: dummy backend, no startup check, fixed token.
pub fn base_config() -> Config {
    Config {
        log_level: "info".into(),
        log_level_forced: false,
        relay: RelayConfig { bind: "127.0.0.1:0".into() },
        inference: InferenceConfig {
            backend: Backend::Dummy,
            api_base_url: "http://127.0.0.1:0/models".into(),
            sentiment_model: "test/sentiment".into(),
            ner_model: "test/ner".into(),
            wait_for_model: true,
            startup_check: false,
            timeout: Some(Duration::from_secs(5)),
        },
        ui: UiConfig {
            bind: "127.0.0.1:0".into(),
            api_base_url: "http://127.0.0.1:0".into(),
        },
        api_token: Some("test-token".into()),
    }
}

/// Relay config pointing at `upstream`, no startup check.
pub fn relay_config(upstream: &FakeUpstream) -> Config {
    let mut cfg = base_config();
    cfg.inference.backend = Backend::Hosted;
    cfg.inference.api_base_url = upstream.base_url();
    cfg.inference.sentiment_model = SENTIMENT_MODEL.into();
    cfg.inference.ner_model = NER_MODEL.into();
    cfg.api_token = Some(TOKEN.into());
    cfg
}

pub async fn relay_for(upstream: &FakeUpstream) -> Relay {
    Relay::from_config(&relay_config(upstream)).await.unwrap()
}
