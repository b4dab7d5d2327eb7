//! Proxy service — forwards analysis requests to the inference backend and
//! relays its JSON (or a translated error) back to the caller.
//!
//! ## URL layout
//!
//! ```text
//! GET  /api/health
//! POST /api/health/refresh
//! POST /api/analyze-sentiment
//! POST /api/analyze-sentiment/batch
//! POST /api/extract-entities
//! GET  /favicon.ico              → 204
//! ```

mod api;

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::inference::{InferenceClient, providers};

// ── Shared request state ──────────────────────────────────────────────────────

/// Router state injected into every handler.
///
/// Cheap to clone: the client is `Arc`-backed and the flag is shared.
#[derive(Clone)]
pub(crate) struct RelayState {
    pub inference: InferenceClient,
    /// Result of the most recent credential/model check.
    pub model_ready: Arc<AtomicBool>,
}

impl RelayState {
    pub fn is_ready(&self) -> bool {
        self.model_ready.load(Ordering::Acquire)
    }

    /// Run the backend check and record the outcome.
    pub async fn check_model(&self) -> bool {
        let ready = match self.inference.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!(backend = self.inference.backend_name(), error = %e, "model check failed");
                false
            }
        };
        self.model_ready.store(ready, Ordering::Release);
        ready
    }
}

// ── Relay ─────────────────────────────────────────────────────────────────────

pub struct Relay {
    state: RelayState,
}

impl Relay {
    /// Wrap an already-built client. `model_ready` is the initial health flag.
    pub fn new(inference: InferenceClient, model_ready: bool) -> Self {
        Self {
            state: RelayState {
                inference,
                model_ready: Arc::new(AtomicBool::new(model_ready)),
            },
        }
    }

    /// Build the relay from resolved config.
    ///
    /// Fails fast with a config error when the credential is missing. When
    /// `startup_check` is on, the backend is checked once and the result
    /// becomes the initial `model_ready`; a failed check is logged, not fatal.
    /// With the check off, readiness is assumed.
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        let token = config.require_api_token()?;
        let inference = providers::build(&config.inference, token)?;

        let relay = Self::new(inference, !config.inference.startup_check);
        if config.inference.startup_check {
            let ready = relay.state.check_model().await;
            info!(backend = relay.state.inference.backend_name(), model_ready = ready, "startup model check done");
        } else {
            warn!(backend = relay.state.inference.backend_name(), "startup_check disabled, model readiness assumed");
        }
        Ok(relay)
    }

    pub fn model_ready(&self) -> bool {
        self.state.is_ready()
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Bind `bind_addr` and serve until `shutdown` is cancelled.
    pub async fn serve(self, bind_addr: &str, shutdown: CancellationToken) -> Result<(), AppError> {
        let router = self.router();

        let listener = TcpListener::bind(bind_addr)
            .await
            .map_err(|e| AppError::Server(format!("relay bind failed on {bind_addr}: {e}")))?;

        info!(%bind_addr, model_ready = self.model_ready(), "relay listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
            .map_err(|e| AppError::Server(format!("relay server error: {e}")))?;

        info!("relay shut down");
        Ok(())
    }
}

// ── Router ────────────────────────────────────────────────────────────────────

fn build_router(state: RelayState) -> Router {
    Router::new()
        .route("/api/health",                  get(api::health))
        .route("/api/health/refresh",          post(api::health_refresh))
        .route("/api/analyze-sentiment",       post(api::analyze_sentiment))
        .route("/api/analyze-sentiment/batch", post(api::analyze_sentiment_batch))
        .route("/api/extract-entities",        post(api::extract_entities))
        .route("/favicon.ico", get(|| async { StatusCode::NO_CONTENT }))
        .with_state(state)
}
