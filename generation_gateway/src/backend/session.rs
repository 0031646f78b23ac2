use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::{
    backend::GenerationBackend,
    config::AppConfig,
    error::GatewayError,
    generation::GenerationParameters,
    upstream::{IamClient, IamToken, InferenceClient},
};

const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

struct CachedToken {
    value: String,
    // None when the lifetime runs past what `Instant` can represent
    expires_at: Option<Instant>,
}

/// Holds the most recent bearer token until shortly before it expires.
pub struct TokenCache {
    refresh_margin: Duration,
    slot: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new(refresh_margin: Duration) -> Self {
        Self {
            refresh_margin,
            slot: Mutex::new(None),
        }
    }

    pub fn get(&self, now: Instant) -> Option<String> {
        let slot = self.slot.lock();
        slot.as_ref()
            .filter(|cached| match (cached.expires_at, now.checked_add(self.refresh_margin)) {
                (None, _) => true,
                (Some(expires_at), Some(refresh_at)) => refresh_at < expires_at,
                (Some(_), None) => false,
            })
            .map(|cached| cached.value.clone())
    }

    pub fn store(&self, token: &IamToken, now: Instant) {
        let lifetime = token
            .expires_in
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TOKEN_LIFETIME);
        *self.slot.lock() = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: now.checked_add(lifetime),
        });
    }
}

/// Client configured once with key and endpoint; reuses its credential
/// across requests.
pub struct SessionBackend {
    iam: IamClient,
    inference: InferenceClient,
    tokens: TokenCache,
}

impl SessionBackend {
    pub fn new(config: &AppConfig, http: reqwest::Client) -> Self {
        Self {
            iam: IamClient::new(config, http.clone()),
            inference: InferenceClient::new(config, http),
            tokens: TokenCache::new(config.token_refresh_margin),
        }
    }

    async fn bearer(&self) -> Result<String, GatewayError> {
        if let Some(token) = self.tokens.get(Instant::now()) {
            return Ok(token);
        }
        debug!("refreshing session credential");
        let token = self.iam.exchange().await?;
        self.tokens.store(&token, Instant::now());
        Ok(token.access_token)
    }
}

#[async_trait]
impl GenerationBackend for SessionBackend {
    fn name(&self) -> &'static str {
        "session"
    }

    async fn generate(
        &self,
        prompt: &str,
        model_id: &str,
        parameters: &GenerationParameters,
    ) -> Result<String, GatewayError> {
        let bearer = self.bearer().await?;
        self.inference
            .invoke(&bearer, model_id, prompt, parameters)
            .await
    }
}
