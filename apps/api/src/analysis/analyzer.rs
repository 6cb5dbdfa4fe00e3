//! Analysis Client: validated request + endpoint config → completion → strict parse.

use tracing::{debug, info};

use crate::analysis::models::{AnalysisRequest, AnalysisResult};
use crate::analysis::parser::parse_analysis;
use crate::analysis::prompts::{analysis_system_prompt, build_analysis_prompt};
use crate::analysis::AnalysisError;
use crate::llm_client::{CompletionBackend, LlmConfig};

/// Runs one ATS analysis.
///
/// The endpoint configuration is validated before anything is sent, so a
/// missing credential fails with `Configuration` without touching the network.
/// No caching: identical requests may yield different results.
pub async fn analyze_resume(
    request: &AnalysisRequest,
    config: &LlmConfig,
    backend: &dyn CompletionBackend,
) -> Result<AnalysisResult, AnalysisError> {
    let endpoint = config.endpoint()?;

    let system = analysis_system_prompt();
    let prompt = build_analysis_prompt(request.resume_text(), request.job_description());

    info!(
        "Requesting ATS analysis (model: {}, resume: {} chars, job description: {} chars)",
        endpoint.model(),
        request.resume_text().chars().count(),
        request.job_description().chars().count()
    );

    let completion = backend.complete(&endpoint, &system, &prompt).await?;
    debug!("Completion received: {} chars", completion.len());

    let result = parse_analysis(&completion)?;

    if result.score_breakdown().total() != u32::from(result.score()) {
        debug!(
            "Score {} differs from breakdown total {}",
            result.score(),
            result.score_breakdown().total()
        );
    }
    info!(
        "ATS analysis complete: score {} ({})",
        result.score(),
        result.score_band().label()
    );

    Ok(result)
}
