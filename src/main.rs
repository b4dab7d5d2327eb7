//! finsent relay — entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config
//!   3. Init logger
//!   4. Build the relay (fatal if HF_API_TOKEN is missing), run model check
//!   5. Spawn Ctrl-C → shutdown watcher
//!   6. Serve until shutdown

use tokio_util::sync::CancellationToken;
use tracing::info;

use finsent::{config, error::AppError, logger, relay::Relay};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // .env is optional.
    let _ = dotenvy::dotenv();

    let config = config::load()?;
    logger::init(&config.log_level, config.log_level_forced)?;

    info!(
        bind = %config.relay.bind,
        backend = ?config.inference.backend,
        sentiment_model = %config.inference.sentiment_model,
        ner_model = %config.inference.ner_model,
        "config loaded"
    );

    let relay = Relay::from_config(&config).await?;

    let shutdown = CancellationToken::new();
    let ctrlc_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received, shutting down");
            ctrlc_token.cancel();
        }
    });

    relay.serve(&config.relay.bind, shutdown).await
}
