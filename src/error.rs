//! Application-wide error types.

use thiserror::Error;

use crate::inference::InferenceError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("template error: {0}")]
    Template(String),

    #[error("inference error: {0}")]
    Inference(#[from] InferenceError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
