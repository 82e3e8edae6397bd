use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::airtable::AirtableError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Callers match on the `error` string, so each variant owns its body shape.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Validation error: {0}")]
    Validation(&'static str),

    #[error("Job not found: {job_number}")]
    JobNotFound { job_number: String },

    #[error("Airtable lookup failed: {0}")]
    AirtableLookup(#[from] AirtableError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::InvalidBody(details) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid JSON body", "details": details }),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::JobNotFound { job_number } => (
                StatusCode::NOT_FOUND,
                json!({ "error": "Job not found", "jobNumber": job_number }),
            ),
            AppError::AirtableLookup(e) => {
                tracing::error!("Airtable lookup error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    json!({ "error": "Airtable lookup failed", "details": e.to_string() }),
                )
            }
            AppError::Llm(LlmError::InvalidJson { details, raw }) => {
                tracing::error!("Model returned invalid JSON: {details}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "Claude returned invalid JSON",
                        "details": details,
                        "raw_response": raw
                    }),
                )
            }
            AppError::Llm(LlmError::UnexpectedShape { details, raw }) => {
                tracing::error!("Model returned an unexpected JSON shape: {details}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "Claude returned an unexpected response shape",
                        "details": details,
                        "raw_response": raw
                    }),
                )
            }
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error", "details": e.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_body_is_flat() {
        let (status, body) = render(AppError::Validation("No job number provided")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "No job number provided" }));
    }

    #[tokio::test]
    async fn test_job_not_found_echoes_job_number() {
        let (status, body) = render(AppError::JobNotFound {
            job_number: "J-7".to_string(),
        })
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Job not found", "jobNumber": "J-7" }));
    }

    #[tokio::test]
    async fn test_invalid_json_includes_raw_response() {
        let (status, body) = render(AppError::Llm(LlmError::InvalidJson {
            details: "expected value at line 1 column 1".to_string(),
            raw: "Sorry, I can't".to_string(),
        }))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Claude returned invalid JSON");
        assert_eq!(body["raw_response"], "Sorry, I can't");
    }

    #[tokio::test]
    async fn test_unexpected_shape_includes_raw_response() {
        let (status, body) = render(AppError::Llm(LlmError::UnexpectedShape {
            details: "invalid type: string \"yes\", expected a boolean".to_string(),
            raw: "{\"withClient\": \"yes\"}".to_string(),
        }))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Claude returned an unexpected response shape");
        assert_eq!(body["raw_response"], "{\"withClient\": \"yes\"}");
    }

    #[tokio::test]
    async fn test_other_llm_errors_are_internal() {
        let (status, body) = render(AppError::Llm(LlmError::EmptyContent)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["details"], "LLM returned empty content");
    }

    #[tokio::test]
    async fn test_airtable_lookup_is_bad_gateway() {
        let (status, body) = render(AppError::AirtableLookup(AirtableError::Api {
            status: 503,
            message: "unavailable".to_string(),
        }))
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "Airtable lookup failed");
    }
}
