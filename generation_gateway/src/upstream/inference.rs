use std::time::{Duration, Instant};

use axum::http::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    config::{AppConfig, EndpointMode},
    error::GatewayError,
    generation::{GenerationParameters, InferencePayload, InferenceReply},
};

/// Shapes and sends the inference call, then normalizes whatever comes back.
#[derive(Clone)]
pub struct InferenceClient {
    http: reqwest::Client,
    mode: EndpointMode,
    url: String,
    project_id: String,
    timeout: Duration,
}

impl InferenceClient {
    pub fn new(config: &AppConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            mode: config.endpoint_mode,
            url: config.inference_url(),
            project_id: config.project_id.clone(),
            timeout: config.inference_timeout,
        }
    }

    pub async fn invoke(
        &self,
        bearer: &str,
        model_id: &str,
        prompt: &str,
        parameters: &GenerationParameters,
    ) -> Result<String, GatewayError> {
        let payload =
            InferencePayload::shape(self.mode, model_id, &self.project_id, prompt, parameters);

        let start = Instant::now();
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(bearer)
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(GatewayError::inference_request)?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            warn!(%status, "inference endpoint returned an error");
            return Err(upstream_status_error(status, raw));
        }

        let body: Value = response
            .json()
            .await
            .map_err(GatewayError::inference_request)?;
        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "inference response received"
        );

        Ok(InferenceReply::classify(body).into_text())
    }
}

fn upstream_status_error(status: StatusCode, raw: String) -> GatewayError {
    let status = if status.is_client_error() || status.is_server_error() {
        status
    } else {
        StatusCode::BAD_GATEWAY
    };
    let detail = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
    GatewayError::UpstreamInference { status, detail }
}
