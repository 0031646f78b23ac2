use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{config::AppConfig, error::GatewayError};

const API_KEY_GRANT: &str = "urn:ibm:params:oauth:grant-type:apikey";

#[derive(Debug, Clone, Deserialize)]
pub struct IamToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Exchanges the long-lived API key for a short-lived bearer token.
#[derive(Clone)]
pub struct IamClient {
    http: reqwest::Client,
    token_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl IamClient {
    pub fn new(config: &AppConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            token_url: config.iam_token_url.clone(),
            api_key: config.api_key.clone(),
            timeout: config.iam_timeout,
        }
    }

    pub async fn exchange(&self) -> Result<IamToken, GatewayError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            GatewayError::Configuration("IBMCLOUD_API_KEY is not set".to_string())
        })?;

        let response = self
            .http
            .post(&self.token_url)
            .header(ACCEPT, "application/json")
            .form(&[("grant_type", API_KEY_GRANT), ("apikey", api_key)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(auth_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "identity provider rejected token exchange");
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::UpstreamAuth(format!("{status}: {body}")));
        }

        let token: IamToken = response.json().await.map_err(auth_error)?;
        debug!(expires_in = ?token.expires_in, "obtained bearer token");
        Ok(token)
    }
}

fn auth_error(err: reqwest::Error) -> GatewayError {
    warn!(error = %err, "token exchange failed");
    GatewayError::UpstreamAuth(err.to_string())
}
