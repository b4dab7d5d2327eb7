//! Axum front-end serving the analyzer page.
//!
//! ```text
//! GET  /            → empty form
//! POST /analyze     → form field `headlines`, renders results
//! GET  /favicon.ico → 204
//! ```

use std::sync::Arc;

use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::Local;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::render::{Notice, PageView, Renderer};
use super::{RelayClient, Submission, analyze_submission};
use crate::error::AppError;

#[derive(Clone)]
struct UiState {
    client: RelayClient,
    renderer: Arc<Renderer>,
}

#[derive(Deserialize)]
struct AnalyzeForm {
    #[serde(default)]
    headlines: String,
}

pub struct UiServer {
    client: RelayClient,
    renderer: Arc<Renderer>,
}

impl UiServer {
    /// Fails only if the page templates do not compile.
    pub fn new(client: RelayClient) -> Result<Self, AppError> {
        Ok(Self { client, renderer: Arc::new(Renderer::new()?) })
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/",            get(index))
            .route("/analyze",     post(analyze))
            .route("/favicon.ico", get(|| async { StatusCode::NO_CONTENT }))
            .with_state(UiState {
                client: self.client.clone(),
                renderer: Arc::clone(&self.renderer),
            })
    }

    /// Bind `bind_addr` and serve until `shutdown` is cancelled.
    pub async fn serve(self, bind_addr: &str, shutdown: CancellationToken) -> Result<(), AppError> {
        let router = self.router();

        let listener = TcpListener::bind(bind_addr)
            .await
            .map_err(|e| AppError::Server(format!("ui bind failed on {bind_addr}: {e}")))?;

        info!(%bind_addr, relay = %self.client.base_url(), "ui listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
            .map_err(|e| AppError::Server(format!("ui server error: {e}")))?;

        info!("ui shut down");
        Ok(())
    }
}

async fn index(State(state): State<UiState>) -> Response {
    page(&state.renderer, &PageView::blank())
}

async fn analyze(State(state): State<UiState>, Form(form): Form<AnalyzeForm>) -> Response {
    let input = form.headlines.as_str();
    match analyze_submission(&state.client, input).await {
        Ok(Submission::Empty) => page(&state.renderer, &PageView {
            input,
            notice: Some(Notice::Warning("Please enter some text to analyze.".into())),
            reports: &[],
            analyzed_at: None,
        }),
        Ok(Submission::Analyzed(reports)) => page(&state.renderer, &PageView {
            input,
            notice: None,
            reports: &reports,
            analyzed_at: Some(Local::now()),
        }),
        Err(e) => {
            warn!(error = %e, "submission failed");
            page(&state.renderer, &PageView {
                input,
                notice: Some(Notice::Error(e.to_string())),
                reports: &[],
                analyzed_at: None,
            })
        }
    }
}

fn page(renderer: &Renderer, view: &PageView<'_>) -> Response {
    match renderer.render_page(view) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!(error = %e, "page render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "page render failed").into_response()
        }
    }
}
