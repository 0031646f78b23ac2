use std::{
    env, fmt,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

pub const DEFAULT_IAM_TOKEN_URL: &str = "https://iam.cloud.ibm.com/identity/token";

/// Which inference endpoint (and payload shape) every request uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointMode {
    Generation,
    Chat,
}

#[derive(Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub app_name: String,
    pub api_url: String,
    pub project_id: String,
    pub llm_model_id: String,
    pub embedding_model_id: String,
    pub api_key: Option<String>,
    pub verify_tls: bool,
    pub endpoint_mode: EndpointMode,
    pub use_session_client: bool,
    pub api_version: String,
    pub iam_token_url: String,
    pub iam_timeout: Duration,
    pub inference_timeout: Duration,
    pub token_refresh_margin: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::from_lookup(|key| env::var(key).ok()))
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr = lookup("SERVER_ADDR")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080));

        let app_name = lookup("APP_NAME").unwrap_or_else(|| "watsonx-ai-agent01".to_string());
        let api_url = lookup("WATSONX_API_URL")
            .unwrap_or_else(|| "https://eu-de.ml.cloud.ibm.com".to_string())
            .trim_end_matches('/')
            .to_string();
        let project_id = lookup("WATSONX_PROJECT_ID").unwrap_or_default();
        let llm_model_id = lookup("WATSONX_LLM_MODEL_ID")
            .unwrap_or_else(|| "mistralai/mistral-large".to_string());
        let embedding_model_id = lookup("WATSONX_EMBEDDING_MODEL_ID")
            .unwrap_or_else(|| "ibm/slate-125m-english-rtrvr".to_string());
        let api_key = lookup("IBMCLOUD_API_KEY").filter(|key| !key.is_empty());

        let verify_tls = lookup("WATSONX_VERIFY_TLS")
            .map(|v| !v.eq_ignore_ascii_case("false"))
            .unwrap_or(true);
        let endpoint_mode = if flag(lookup("WATSONX_USE_CHAT")) {
            EndpointMode::Chat
        } else {
            EndpointMode::Generation
        };
        let use_session_client = flag(lookup("WATSONX_USE_SDK"));
        let api_version = lookup("WATSONX_API_VERSION").unwrap_or_else(|| "2023-05-29".to_string());
        let iam_token_url =
            lookup("IAM_TOKEN_URL").unwrap_or_else(|| DEFAULT_IAM_TOKEN_URL.to_string());

        let iam_timeout = seconds(lookup("IAM_TIMEOUT_SECS"), 30);
        let inference_timeout = seconds(lookup("INFERENCE_TIMEOUT_SECS"), 120);
        let token_refresh_margin = seconds(lookup("TOKEN_REFRESH_MARGIN_SECS"), 60);

        Self {
            listen_addr,
            app_name,
            api_url,
            project_id,
            llm_model_id,
            embedding_model_id,
            api_key,
            verify_tls,
            endpoint_mode,
            use_session_client,
            api_version,
            iam_token_url,
            iam_timeout,
            inference_timeout,
            token_refresh_margin,
        }
    }

    pub fn generation_url(&self) -> String {
        format!(
            "{}/ml/v1/text/generation?version={}",
            self.api_url, self.api_version
        )
    }

    pub fn chat_url(&self) -> String {
        format!("{}/ml/v1/text/chat?version={}", self.api_url, self.api_version)
    }

    pub fn inference_url(&self) -> String {
        match self.endpoint_mode {
            EndpointMode::Generation => self.generation_url(),
            EndpointMode::Chat => self.chat_url(),
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("listen_addr", &self.listen_addr)
            .field("app_name", &self.app_name)
            .field("api_url", &self.api_url)
            .field("project_id", &self.project_id)
            .field("llm_model_id", &self.llm_model_id)
            .field("embedding_model_id", &self.embedding_model_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("verify_tls", &self.verify_tls)
            .field("endpoint_mode", &self.endpoint_mode)
            .field("use_session_client", &self.use_session_client)
            .field("api_version", &self.api_version)
            .field("iam_token_url", &self.iam_token_url)
            .field("iam_timeout", &self.iam_timeout)
            .field("inference_timeout", &self.inference_timeout)
            .field("token_refresh_margin", &self.token_refresh_margin)
            .finish()
    }
}

fn flag(raw: Option<String>) -> bool {
    raw.map(|v| v.eq_ignore_ascii_case("true")).unwrap_or(false)
}

/// Accepts whole or fractional seconds ("30", "0.25").
fn seconds(raw: Option<String>, default: u64) -> Duration {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .unwrap_or_else(|| Duration::from_secs(default))
}
