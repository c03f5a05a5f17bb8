use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::generation::generator::GenerationError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Generation in flight")]
    InFlight,

    #[error("Upstream timeout")]
    UpstreamTimeout,

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Content blocked: {0}")]
    ContentBlocked(String),

    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<GenerationError> for AppError {
    fn from(e: GenerationError) -> Self {
        match e {
            GenerationError::InvalidInput(msg) => AppError::Validation(msg),
            GenerationError::InFlight => AppError::InFlight,
            GenerationError::TransportTimeout => AppError::UpstreamTimeout,
            GenerationError::TransportFailure(msg) => AppError::Upstream(msg),
            GenerationError::ContentBlocked(reason) => AppError::ContentBlocked(reason.to_string()),
            GenerationError::MalformedPayload(msg) => AppError::MalformedResponse(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InFlight => (
                StatusCode::CONFLICT,
                "GENERATION_IN_FLIGHT",
                "A generation is already running; wait for it to finish".to_string(),
            ),
            AppError::UpstreamTimeout => {
                tracing::warn!("Upstream generator timed out");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "UPSTREAM_TIMEOUT",
                    "The generation service did not respond in time".to_string(),
                )
            }
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {msg}");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg.clone())
            }
            AppError::ContentBlocked(reason) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "CONTENT_BLOCKED",
                format!("The request was blocked by the generation service ({reason})"),
            ),
            AppError::MalformedResponse(msg) => {
                tracing::error!("Malformed upstream response: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "MALFORMED_RESPONSE",
                    "The generation service returned an unreadable response".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::BlockReason;

    #[test]
    fn test_generation_errors_map_to_status_codes() {
        let cases = [
            (GenerationError::InvalidInput("count".into()), StatusCode::BAD_REQUEST),
            (GenerationError::InFlight, StatusCode::CONFLICT),
            (GenerationError::TransportTimeout, StatusCode::GATEWAY_TIMEOUT),
            (GenerationError::TransportFailure("503".into()), StatusCode::BAD_GATEWAY),
            (
                GenerationError::ContentBlocked(BlockReason::Safety),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (GenerationError::MalformedPayload("empty".into()), StatusCode::BAD_GATEWAY),
        ];
        for (err, expected) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_not_found_status() {
        let response = AppError::NotFound("program".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
