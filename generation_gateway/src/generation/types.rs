use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::GatewayError;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GenerationRequest {
    #[schema(example = "Explain the borrow checker in one sentence.")]
    pub prompt: String,
    #[serde(default = "default_max_new_tokens")]
    #[schema(default = default_max_new_tokens)]
    pub max_new_tokens: u32,
    /// 0 selects greedy decoding.
    #[serde(default = "default_temperature")]
    #[schema(default = default_temperature)]
    pub temperature: f64,
    #[serde(default)]
    pub top_p: Option<f64>,
    /// If set, must be >= 1.
    #[serde(default)]
    #[schema(minimum = 1)]
    pub top_k: Option<i64>,
    /// If set, must be >= 1.0.
    #[serde(default = "default_repetition_penalty")]
    #[schema(default = default_repetition_penalty, minimum = 1.0)]
    pub repetition_penalty: Option<f64>,
    #[serde(default)]
    pub stop_sequences: Option<Vec<String>>,
    /// Empty or placeholder values fall back to the configured default model.
    #[serde(default)]
    pub model_id: Option<String>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_new_tokens: default_max_new_tokens(),
            temperature: default_temperature(),
            top_p: None,
            top_k: None,
            repetition_penalty: default_repetition_penalty(),
            stop_sequences: None,
            model_id: None,
        }
    }

    /// Rejects out-of-bound optional fields before anything leaves the process.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if let Some(top_k) = self.top_k {
            if top_k < 1 {
                return Err(GatewayError::Validation(format!(
                    "top_k must be >= 1, got {top_k}"
                )));
            }
        }
        if let Some(penalty) = self.repetition_penalty {
            if penalty < 1.0 {
                return Err(GatewayError::Validation(format!(
                    "repetition_penalty must be >= 1.0, got {penalty}"
                )));
            }
        }
        Ok(())
    }
}

fn default_max_new_tokens() -> u32 {
    128
}

fn default_temperature() -> f64 {
    0.7
}

fn default_repetition_penalty() -> Option<f64> {
    Some(1.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GenerationResult {
    pub text: String,
    pub model_id: String,
}
