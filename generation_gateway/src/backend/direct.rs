use async_trait::async_trait;

use crate::{
    backend::GenerationBackend,
    config::AppConfig,
    error::GatewayError,
    generation::GenerationParameters,
    upstream::{IamClient, InferenceClient},
};

/// Exchanges a fresh credential for every request.
pub struct DirectBackend {
    iam: IamClient,
    inference: InferenceClient,
}

impl DirectBackend {
    pub fn new(config: &AppConfig, http: reqwest::Client) -> Self {
        Self {
            iam: IamClient::new(config, http.clone()),
            inference: InferenceClient::new(config, http),
        }
    }
}

#[async_trait]
impl GenerationBackend for DirectBackend {
    fn name(&self) -> &'static str {
        "direct"
    }

    async fn generate(
        &self,
        prompt: &str,
        model_id: &str,
        parameters: &GenerationParameters,
    ) -> Result<String, GatewayError> {
        let token = self.iam.exchange().await?;
        self.inference
            .invoke(&token.access_token, model_id, prompt, parameters)
            .await
    }
}
