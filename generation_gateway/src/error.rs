use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("{0}")]
    Configuration(String),
    #[error("IAM token error: {0}")]
    UpstreamAuth(String),
    #[error("inference upstream failed with status {status}")]
    UpstreamInference { status: StatusCode, detail: Value },
    #[error("{0}")]
    Unexpected(String),
}

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    /// A message, or the upstream's own error body when it was JSON.
    #[schema(value_type = Object)]
    pub detail: Value,
}

impl GatewayError {
    /// A failed inference call with no usable upstream status.
    pub fn inference_request(cause: impl std::fmt::Display) -> Self {
        GatewayError::UpstreamInference {
            status: StatusCode::BAD_GATEWAY,
            detail: Value::String(format!("inference request error: {cause}")),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::UpstreamAuth(_) | GatewayError::Unexpected(_) => StatusCode::BAD_GATEWAY,
            GatewayError::UpstreamInference { status, .. } => *status,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            GatewayError::UpstreamInference { detail, .. } => detail,
            other => Value::String(other.to_string()),
        };

        (status, axum::Json(ErrorDetail { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_taxonomy() {
        assert_eq!(
            GatewayError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::Configuration("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            GatewayError::UpstreamAuth("x".into()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            GatewayError::Unexpected("x".into()).status(),
            StatusCode::BAD_GATEWAY
        );
        let mirrored = GatewayError::UpstreamInference {
            status: StatusCode::TOO_MANY_REQUESTS,
            detail: Value::Null,
        };
        assert_eq!(mirrored.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn transport_failures_default_to_bad_gateway() {
        let err = GatewayError::inference_request("connection reset");
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        match err {
            GatewayError::UpstreamInference { detail, .. } => {
                assert_eq!(detail, "inference request error: connection reset")
            }
            other => panic!("unexpected variant {other:?}"),
        }
    }
}
