// Shared mock upstream and request helpers for the integration tests
#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Form, Json, Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::post,
};
use generation_gateway::{AppConfig, Generator, build_router};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tokio::{net::TcpListener, task::JoinHandle};
use tower::ServiceExt;

/// How the mock identity and inference endpoints answer.
#[derive(Clone)]
pub struct UpstreamBehavior {
    pub iam_status: StatusCode,
    pub expires_in: Option<u64>,
    pub inference_status: StatusCode,
    pub inference_body: String,
    pub iam_delay: Duration,
    pub inference_delay: Duration,
}

impl UpstreamBehavior {
    pub fn replying(body: Value) -> Self {
        Self {
            iam_status: StatusCode::OK,
            expires_in: Some(3600),
            inference_status: StatusCode::OK,
            inference_body: body.to_string(),
            iam_delay: Duration::ZERO,
            inference_delay: Duration::ZERO,
        }
    }
}

#[derive(Default)]
pub struct Recorded {
    pub iam_calls: AtomicUsize,
    pub inference_calls: AtomicUsize,
    pub last_form: Mutex<Option<HashMap<String, String>>>,
    pub last_payload: Mutex<Option<Value>>,
    pub last_authorization: Mutex<Option<String>>,
    pub last_uri: Mutex<Option<Uri>>,
}

impl Recorded {
    pub fn iam_calls(&self) -> usize {
        self.iam_calls.load(Ordering::SeqCst)
    }

    pub fn inference_calls(&self) -> usize {
        self.inference_calls.load(Ordering::SeqCst)
    }

    pub fn payload(&self) -> Value {
        self.last_payload.lock().unwrap().clone().expect("no inference payload recorded")
    }
}

#[derive(Clone)]
struct MockState {
    behavior: UpstreamBehavior,
    recorded: Arc<Recorded>,
}

pub struct MockUpstream {
    pub base_url: String,
    pub recorded: Arc<Recorded>,
    handle: JoinHandle<()>,
}

impl MockUpstream {
    pub async fn start(behavior: UpstreamBehavior) -> Self {
        let recorded = Arc::new(Recorded::default());
        let state = MockState {
            behavior,
            recorded: recorded.clone(),
        };

        let app = Router::new()
            .route("/identity/token", post(token))
            .route("/ml/v1/text/generation", post(inference))
            .route("/ml/v1/text/chat", post(inference))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            recorded,
            handle,
        }
    }

    pub fn config(&self, extra: &[(&str, &str)]) -> AppConfig {
        let token_url = format!("{}/identity/token", self.base_url);
        let mut vars = vec![
            ("WATSONX_API_URL", self.base_url.as_str()),
            ("IAM_TOKEN_URL", token_url.as_str()),
            ("IBMCLOUD_API_KEY", "test-key"),
            ("WATSONX_PROJECT_ID", "proj-1"),
            ("WATSONX_LLM_MODEL_ID", "ibm/granite-default"),
            ("APP_NAME", "gateway-test"),
        ];
        vars.extend_from_slice(extra);
        config_from(&vars)
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn token(
    State(state): State<MockState>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let n = state.recorded.iam_calls.fetch_add(1, Ordering::SeqCst) + 1;
    *state.recorded.last_form.lock().unwrap() = Some(form);
    tokio::time::sleep(state.behavior.iam_delay).await;

    if !state.behavior.iam_status.is_success() {
        return (state.behavior.iam_status, "invalid apikey").into_response();
    }
    let mut body = json!({
        "access_token": format!("mock-token-{n}"),
        "token_type": "Bearer",
    });
    if let Some(expires_in) = state.behavior.expires_in {
        body["expires_in"] = json!(expires_in);
    }
    Json(body).into_response()
}

async fn inference(
    State(state): State<MockState>,
    uri: Uri,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Response {
    state.recorded.inference_calls.fetch_add(1, Ordering::SeqCst);
    *state.recorded.last_payload.lock().unwrap() = Some(payload);
    *state.recorded.last_uri.lock().unwrap() = Some(uri);
    *state.recorded.last_authorization.lock().unwrap() = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    tokio::time::sleep(state.behavior.inference_delay).await;

    (
        state.behavior.inference_status,
        [(header::CONTENT_TYPE, "application/json")],
        state.behavior.inference_body.clone(),
    )
        .into_response()
}

pub fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    AppConfig::from_lookup(|key| vars.get(key).cloned())
}

pub fn app(config: AppConfig) -> Router {
    let generator = Arc::new(Generator::initialize(&config).unwrap());
    build_router(Arc::new(config), generator)
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, headers, body)
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, HeaderMap, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_raw(app: Router, uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap();
    let (status, _, body) = send(app, request).await;
    (status, body)
}

pub async fn generate(app: Router, body: Value) -> (StatusCode, Value) {
    post_raw(app, "/v1/generate", body.to_string()).await
}
