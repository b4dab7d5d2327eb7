//! Dummy backend — answers every request with a neutral verdict and no
//! entities. Lets the relay and UI run end to end without a credential
//! that reaches a real endpoint.

use serde_json::{Value, json};

use crate::inference::InferenceError;

#[derive(Debug, Clone)]
pub struct DummyProvider;

impl DummyProvider {
    pub async fn sentiment(&self, _text: &str) -> Result<Value, InferenceError> {
        Ok(json!([[neutral()]]))
    }

    pub async fn sentiment_batch(
        &self,
        texts: &[String],
        _wait_for_model: bool,
    ) -> Result<Value, InferenceError> {
        Ok(Value::Array(texts.iter().map(|_| json!([neutral()])).collect()))
    }

    pub async fn entities(&self, _text: &str) -> Result<Value, InferenceError> {
        Ok(json!([]))
    }
}

fn neutral() -> Value {
    json!({ "label": "neutral", "score": 1.0 })
}
