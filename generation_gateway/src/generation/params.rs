use serde::Serialize;

use crate::generation::GenerationRequest;

/// Values that API explorers tend to pre-fill into optional string fields.
const PLACEHOLDER_MODEL_IDS: [&str; 3] = ["string", "default", "model"];

/// Resolves the model id a request should run against.
pub fn sanitize_model_id(requested: Option<&str>, default_id: &str) -> String {
    let trimmed = requested.unwrap_or_default().trim();
    if trimmed.is_empty()
        || PLACEHOLDER_MODEL_IDS
            .iter()
            .any(|sentinel| trimmed.eq_ignore_ascii_case(sentinel))
    {
        default_id.to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodingMethod {
    Sample,
    Greedy,
}

impl DecodingMethod {
    pub fn for_temperature(temperature: f64) -> Self {
        if temperature > 0.0 {
            DecodingMethod::Sample
        } else {
            DecodingMethod::Greedy
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParameters {
    pub max_new_tokens: u32,
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
    pub decoding_method: DecodingMethod,
}

impl GenerationParameters {
    pub fn from_request(request: &GenerationRequest) -> Self {
        Self {
            max_new_tokens: request.max_new_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
            // out-of-range values are dropped here, not rejected
            top_k: request.top_k.filter(|k| *k >= 1),
            repetition_penalty: request.repetition_penalty,
            stop_sequences: request
                .stop_sequences
                .clone()
                .filter(|stops| !stops.is_empty()),
            decoding_method: DecodingMethod::for_temperature(request.temperature),
        }
    }
}
