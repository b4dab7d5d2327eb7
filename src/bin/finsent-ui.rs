//! finsent-ui — browser front-end entry point.
//!
//! Talks to the relay at `[ui] api_base_url`, overridable with
//! `FINSENT_API_URL`. Needs no inference credential of its own.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use finsent::{
    config,
    error::AppError,
    logger,
    presentation::{RelayClient, UiServer},
};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let _ = dotenvy::dotenv();

    let config = config::load()?;
    logger::init(&config.log_level, config.log_level_forced)?;

    let client = RelayClient::new(config.ui.api_base_url.clone());

    // Informational only; the relay may come up after the UI.
    match client.health().await {
        Ok(h) => info!(relay = %client.base_url(), model_ready = h.model_ready, "relay reachable"),
        Err(e) => warn!(relay = %client.base_url(), error = %e, "relay not reachable yet"),
    }

    let shutdown = CancellationToken::new();
    let ctrlc_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received, shutting down");
            ctrlc_token.cancel();
        }
    });

    UiServer::new(client)?.serve(&config.ui.bind, shutdown).await
}
