use std::{any::Any, sync::Arc};

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{error, info};
use utoipa::ToSchema;

use crate::{
    config::AppConfig,
    docs,
    error::{ErrorDetail, GatewayError},
    generation::{GenerationRequest, GenerationResult, Generator},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub generator: Arc<Generator>,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(value_type = String, example = "ok")]
    pub status: &'static str,
    pub service: String,
}

#[derive(Serialize, ToSchema)]
pub struct ExampleResponse {
    #[schema(value_type = String)]
    pub message: &'static str,
}

pub fn build_router(config: Arc<AppConfig>, generator: Arc<Generator>) -> Router {
    info!(backend = generator.backend_name(), "building router");
    let state = AppState { config, generator };

    Router::new()
        .route("/", get(docs::redirect_to_docs))
        .route("/docs", get(docs::swagger_page))
        .route("/openapi.json", get(docs::openapi))
        .route("/health", get(health))
        .route("/example", get(example))
        .route("/v1/generate", post(generate))
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is serving", body = HealthResponse))
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: state.config.app_name.clone(),
    })
}

#[utoipa::path(
    get,
    path = "/example",
    responses((status = 200, description = "Static example payload", body = ExampleResponse))
)]
pub async fn example() -> Json<ExampleResponse> {
    Json(ExampleResponse {
        message: "This is an example endpoint.",
    })
}

#[utoipa::path(
    post,
    path = "/v1/generate",
    request_body = GenerationRequest,
    responses(
        (status = 200, description = "Generated text", body = GenerationResult),
        (status = 400, description = "Malformed or out-of-bound request", body = ErrorDetail),
        (status = 500, description = "Missing configuration", body = ErrorDetail),
        (status = 502, description = "Upstream failure, or the upstream's own status", body = ErrorDetail)
    )
)]
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<GenerationResult>, GatewayError> {
    let Json(request) = payload.map_err(|rejection| GatewayError::Validation(rejection.body_text()))?;
    let result = state.generator.generate(request).await?;
    Ok(Json(result))
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unexpected internal failure".to_string()
    };
    error!(%message, "handler panicked");
    GatewayError::Unexpected(message).into_response()
}
