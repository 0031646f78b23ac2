use std::{sync::Arc, time::Instant};

use tracing::info;

use crate::{
    backend::{self, GenerationBackend},
    config::AppConfig,
    error::GatewayError,
    generation::{GenerationParameters, GenerationRequest, GenerationResult, sanitize_model_id},
};

/// Runs a generation request end to end against the configured backend.
pub struct Generator {
    backend: Arc<dyn GenerationBackend>,
    default_model_id: String,
}

impl Generator {
    pub fn initialize(config: &AppConfig) -> Result<Self, GatewayError> {
        let http = backend::http_client(config)?;
        Ok(Self::with_backend(
            backend::select(config, http),
            config.llm_model_id.clone(),
        ))
    }

    pub fn with_backend(backend: Arc<dyn GenerationBackend>, default_model_id: String) -> Self {
        Self {
            backend,
            default_model_id,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResult, GatewayError> {
        request.validate()?;

        let model_id = sanitize_model_id(request.model_id.as_deref(), &self.default_model_id);
        let parameters = GenerationParameters::from_request(&request);

        let start = Instant::now();
        let text = self
            .backend
            .generate(&request.prompt, &model_id, &parameters)
            .await?;

        info!(
            backend = self.backend.name(),
            %model_id,
            prompt_chars = request.prompt.chars().count(),
            output_chars = text.chars().count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "generation completed"
        );

        Ok(GenerationResult { text, model_id })
    }
}
