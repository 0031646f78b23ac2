use axum::{
    Json,
    extract::State,
    response::{Html, Redirect},
};
use utoipa::OpenApi;

use crate::{
    error::ErrorDetail,
    generation::{GenerationRequest, GenerationResult},
    server::{self, AppState, ExampleResponse, HealthResponse},
};

#[derive(OpenApi)]
#[openapi(
    info(
        version = "1.0.0",
        description = "Text generation gateway for watsonx.ai. Use /docs to test."
    ),
    paths(server::health, server::example, server::generate),
    components(schemas(
        GenerationRequest,
        GenerationResult,
        HealthResponse,
        ExampleResponse,
        ErrorDetail
    ))
)]
pub struct ApiDoc;

pub async fn redirect_to_docs() -> Redirect {
    Redirect::temporary("/docs")
}

pub async fn swagger_page(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        r##"<!DOCTYPE html>
<html>
<head>
<title>{name} - API Docs</title>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
<div id="swagger-ui"></div>
<script src="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
<script>
SwaggerUIBundle({{ url: "/openapi.json", dom_id: "#swagger-ui" }});
</script>
</body>
</html>
"##,
        name = state.config.app_name
    ))
}

pub async fn openapi(State(state): State<AppState>) -> Json<utoipa::openapi::OpenApi> {
    Json(openapi_document(&state.config.app_name))
}

fn openapi_document(title: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = title.to_string();
    doc
}
