// ATS analysis: prompt construction, completion call, strict response parsing
// and the flattened text report. All completion calls go through llm_client.

pub mod analyzer;
pub mod handlers;
pub mod models;
pub mod parser;
pub mod prompts;
pub mod report;

use thiserror::Error;

use crate::llm_client::{ConfigError, LlmError};

/// Field name used when the response as a whole is unusable.
pub const RESPONSE_FIELD: &str = "<response>";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid input: {field} must not be empty")]
    InvalidInput { field: &'static str },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(LlmError),

    #[error("Could not parse model response: field '{field}' {detail}")]
    ResponseParse { field: String, detail: String },

    #[error("Model response failed validation: field '{field}' {reason}")]
    Validation { field: String, reason: String },
}

impl AnalysisError {
    pub(crate) fn response_parse(field: impl Into<String>, detail: impl Into<String>) -> Self {
        AnalysisError::ResponseParse {
            field: field.into(),
            detail: detail.into(),
        }
    }

    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AnalysisError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<LlmError> for AnalysisError {
    fn from(error: LlmError) -> Self {
        match error {
            // The endpoint answered, but not with something we can read.
            LlmError::EmptyContent => {
                AnalysisError::response_parse(RESPONSE_FIELD, "is empty")
            }
            LlmError::Parse(e) => AnalysisError::response_parse(
                "choices",
                format!("could not be decoded from the completion envelope: {e}"),
            ),
            other => AnalysisError::Network(other),
        }
    }
}
