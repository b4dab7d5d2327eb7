//! Inference backend implementations.
//!
//! `build(config, api_token)` is the factory, called once at relay startup.

pub mod dummy;
pub mod hosted;

use crate::config::{Backend, InferenceConfig};
use crate::inference::{InferenceClient, InferenceError};

/// Construct an `InferenceClient` from config and the bearer credential.
///
/// The caller has already checked that the credential is present; the
/// dummy backend ignores it.
pub fn build(config: &InferenceConfig, api_token: &str) -> Result<InferenceClient, InferenceError> {
    match config.backend {
        Backend::Dummy => Ok(InferenceClient::Dummy(dummy::DummyProvider)),
        Backend::Hosted => {
            let p = hosted::HostedProvider::new(
                config.api_base_url.clone(),
                config.sentiment_model.clone(),
                config.ner_model.clone(),
                config.wait_for_model,
                config.timeout,
                api_token.to_string(),
            )?;
            Ok(InferenceClient::Hosted(p))
        }
    }
}
