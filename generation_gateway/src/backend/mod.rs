mod direct;
#[cfg(feature = "session-client")]
mod session;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::{config::AppConfig, error::GatewayError, generation::GenerationParameters};

pub use direct::DirectBackend;
#[cfg(feature = "session-client")]
pub use session::{SessionBackend, TokenCache};

/// One way of turning a resolved prompt, model id and parameter set into text.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate(
        &self,
        prompt: &str,
        model_id: &str,
        parameters: &GenerationParameters,
    ) -> Result<String, GatewayError>;
}

pub fn http_client(config: &AppConfig) -> Result<reqwest::Client, GatewayError> {
    reqwest::Client::builder()
        .danger_accept_invalid_certs(!config.verify_tls)
        .build()
        .map_err(|e| GatewayError::Configuration(format!("failed to build HTTP client: {e}")))
}

/// Picks the backend once for the lifetime of the process.
pub fn select(config: &AppConfig, http: reqwest::Client) -> Arc<dyn GenerationBackend> {
    if config.use_session_client {
        #[cfg(feature = "session-client")]
        {
            info!("using session client backend");
            return Arc::new(SessionBackend::new(config, http));
        }
        #[cfg(not(feature = "session-client"))]
        tracing::warn!("session client requested but not compiled in, using direct HTTP");
    }
    info!("using direct HTTP backend");
    Arc::new(DirectBackend::new(config, http))
}
