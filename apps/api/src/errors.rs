use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::extract::ExtractError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Component errors keep their own message; this type only picks status and code.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Extraction(#[from] ExtractError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Multipart(#[from] MultipartError),

    #[error("Invalid JSON body: {}", .0.body_text())]
    JsonBody(#[from] JsonRejection),

    #[error("Upload exceeds the maximum size of {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Extraction(e) => {
                let (status, code) = match e {
                    ExtractError::UnsupportedFormat { .. } => {
                        (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_FORMAT")
                    }
                    ExtractError::EmptyFile => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                    ExtractError::NoExtractableText { .. } | ExtractError::Parse { .. } => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "EXTRACTION_FAILED")
                    }
                };
                (status, code, e.to_string())
            }
            AppError::Analysis(e) => {
                let (status, code) = match e {
                    AnalysisError::InvalidInput { .. } => {
                        (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
                    }
                    AnalysisError::Configuration(_) => {
                        (StatusCode::SERVICE_UNAVAILABLE, "CONFIGURATION_ERROR")
                    }
                    AnalysisError::Network(LlmError::Timeout(_)) => {
                        (StatusCode::GATEWAY_TIMEOUT, "NETWORK_TIMEOUT")
                    }
                    AnalysisError::Network(_) => (StatusCode::BAD_GATEWAY, "NETWORK_ERROR"),
                    AnalysisError::ResponseParse { .. } => {
                        (StatusCode::BAD_GATEWAY, "RESPONSE_PARSE_ERROR")
                    }
                    AnalysisError::Validation { .. } => {
                        (StatusCode::BAD_GATEWAY, "VALIDATION_FAILED")
                    }
                };
                if status.is_server_error() {
                    tracing::error!("Analysis failed: {e}");
                }
                (status, code, e.to_string())
            }
            AppError::Multipart(e) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.body_text()),
            AppError::JsonBody(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", self.to_string()),
            AppError::PayloadTooLarge { .. } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                self.to_string(),
            ),
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
