//! Logging initialisation via tracing-subscriber.
//!
//! Each binary calls [`init`] once, after config is resolved.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Initialise the global tracing subscriber writing to stderr.
///
/// When `force_level` is `false`, `RUST_LOG` wins and `level` is the fallback.
/// When it is `true` (e.g. `FINSENT_LOG_LEVEL` was set), `level` wins.
pub fn init(level: &str, force_level: bool) -> Result<(), AppError> {
    let filter = if force_level {
        EnvFilter::try_new(level)
            .map_err(|e| AppError::Logger(format!("invalid log level '{level}': {e}")))?
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level))
            .map_err(|e| AppError::Logger(format!("invalid log level '{level}': {e}")))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::Logger(format!("failed to set subscriber: {e}")))?;

    Ok(())
}

/// Parse a plain level string (`"info"`, `"debug"`, …) into a [`LevelFilter`].
/// Used to reject bad `[logging] level` values at config load time.
pub fn parse_level(level: &str) -> Result<LevelFilter, AppError> {
    if level.is_empty() {
        return Err(AppError::Logger("log level must not be empty".into()));
    }
    level
        .parse::<LevelFilter>()
        .map_err(|_| AppError::Logger(format!("unrecognised log level: '{level}'")))
}
