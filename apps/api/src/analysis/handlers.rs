//! Axum route handlers for resume extraction and ATS analysis.

use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::analysis::analyzer::analyze_resume;
use crate::analysis::models::{AnalysisRequest, AnalysisResult};
use crate::analysis::report::render_text_report;
use crate::errors::AppError;
use crate::extract::{ResumeDocument, ResumeFormat};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub resume_text: String,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub filename: String,
    pub format: ResumeFormat,
    pub characters: usize,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct UploadSummary {
    pub filename: String,
    pub format: ResumeFormat,
    pub characters: usize,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub request_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume: Option<UploadSummary>,
    pub result: AnalysisResult,
    pub report: String,
    pub generated_at: DateTime<Utc>,
}

/// Fields collected from a multipart submission.
#[derive(Default)]
struct Submission {
    file: Option<(String, Bytes)>,
    job_description: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/extract
///
/// Multipart field `file`. Returns the extracted text so the user can check it
/// before running an analysis.
pub async fn handle_extract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let submission = read_submission(multipart, state.config.max_upload_bytes).await?;
    let (filename, bytes) = submission
        .file
        .ok_or_else(|| AppError::Validation("multipart field 'file' is required".to_string()))?;

    let (format, text) = extract_upload(filename.clone(), bytes).await?;

    Ok(Json(ExtractResponse {
        filename,
        format,
        characters: text.chars().count(),
        text,
    }))
}

/// POST /api/v1/resumes/analyze
///
/// Multipart fields `file` and `job_description`. Extracts the resume, runs the
/// analysis and returns the structured result plus the text report.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let submission = read_submission(multipart, state.config.max_upload_bytes).await?;
    let (filename, bytes) = submission
        .file
        .ok_or_else(|| AppError::Validation("multipart field 'file' is required".to_string()))?;
    let job_description = submission.job_description.unwrap_or_default();

    let (format, resume_text) = extract_upload(filename.clone(), bytes).await?;
    let summary = UploadSummary {
        filename,
        format,
        characters: resume_text.chars().count(),
    };

    let request = AnalysisRequest::new(resume_text, job_description)?;
    run_analysis(&state, request, Some(summary)).await
}

/// POST /api/v1/analysis/text
///
/// JSON body with already-extracted resume text.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeTextRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let Json(body) = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge {
                limit: state.config.max_upload_bytes,
            }
        } else {
            AppError::JsonBody(rejection)
        }
    })?;
    let request = AnalysisRequest::new(body.resume_text, body.job_description)?;
    run_analysis(&state, request, None).await
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn run_analysis(
    state: &AppState,
    request: AnalysisRequest,
    resume: Option<UploadSummary>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("ats_analysis", %request_id);

    let result = analyze_resume(&request, &state.config.llm, state.llm.as_ref())
        .instrument(span)
        .await?;
    let report = render_text_report(&result);

    Ok(Json(AnalyzeResponse {
        request_id,
        resume,
        result,
        report,
        generated_at: Utc::now(),
    }))
}

async fn read_submission(mut multipart: Multipart, limit: usize) -> Result<Submission, AppError> {
    let upload_error = |error: MultipartError| {
        if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge { limit }
        } else {
            AppError::Multipart(error)
        }
    };
    let mut submission = Submission::default();

    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().map(str::to_string).ok_or_else(|| {
                    AppError::Validation("multipart field 'file' has no filename".to_string())
                })?;
                let bytes = field.bytes().await.map_err(upload_error)?;
                submission.file = Some((filename, bytes));
            }
            Some("job_description") => {
                submission.job_description = Some(field.text().await.map_err(upload_error)?);
            }
            _ => {}
        }
    }

    Ok(submission)
}

/// Extraction is CPU-bound, so it runs on the blocking pool.
async fn extract_upload(filename: String, bytes: Bytes) -> Result<(ResumeFormat, String), AppError> {
    let document = ResumeDocument::new(filename, bytes)?;
    let format = document.format();
    info!("Extracting {} resume '{}'", format, document.filename());

    let text = tokio::task::spawn_blocking(move || document.extract_text())
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    Ok((format, text))
}
