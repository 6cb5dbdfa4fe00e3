// LLM prompt templates for ATS analysis.
// The JSON schema below is the contract enforced by analysis::parser.

use crate::llm_client::prompts::{JSON_ONLY_REMINDER, JSON_ONLY_SYSTEM};

/// Role description prepended to the shared JSON-only instructions.
pub const ATS_ANALYSIS_ROLE: &str = "You are an expert ATS (Applicant Tracking System) \
    resume evaluator. You compare a resume against a job description exactly as an ATS \
    and an experienced recruiter would.";

/// Instructions and output schema. The resume and job description are appended verbatim.
pub const ATS_ANALYSIS_INSTRUCTIONS: &str = r#"Analyze the resume below against the job description and return ONLY a JSON object with the ATS analysis.

Return a JSON object with this EXACT schema (every field is required, no extra fields):
{
  "ats_score": 75,
  "score_summary": "Brief assessment of competitiveness",
  "matched_keywords": ["keyword1", "keyword2"],
  "missing_keywords": ["missing1", "missing2"],
  "text_replacements": [
    {
      "section": "Experience",
      "original_text": "brief original text copied from the resume",
      "improved_text": "improved version with metrics and job keywords",
      "reason": "why this helps"
    }
  ],
  "detailed_suggestions": [
    {
      "priority": "High",
      "category": "Keywords",
      "issue": "specific issue",
      "solution": "specific solution",
      "expected_impact": "expected result"
    }
  ],
  "score_breakdown": {"keywords": 18, "experience": 20, "skills": 16, "education": 12, "formatting": 14},
  "score_explanation": "Brief explanation of how each category was scored",
  "next_steps": "1. First step. 2. Second step. 3. Third step."
}

RULES:
1. "ats_score" MUST be a single integer from 0 to 100 inclusive. No decimals, no ranges, no "/100".
2. "score_breakdown" values MUST be integers within their maximum:
   keywords 0-25, experience 0-25, skills 0-20, education 0-15, formatting 0-15.
   "ats_score" should equal the sum of the breakdown.
3. "matched_keywords" lists skills, tools and qualifications from the job description that appear in the resume.
   "missing_keywords" lists important ones from the job description that do NOT appear in the resume.
   Use [] when a list is genuinely empty; never omit the field.
4. "priority" MUST be one of "High", "Medium", "Low".
5. "original_text" must be copied from the resume; "improved_text" must not invent experience.
6. "next_steps" is a single string formatted as a numbered list: "1. ... 2. ... 3. ...".
7. Every string value must be non-empty."#;

/// Builds the full system prompt for the analysis call.
pub fn analysis_system_prompt() -> String {
    format!("{ATS_ANALYSIS_ROLE} {JSON_ONLY_SYSTEM}")
}

/// Builds the user prompt. Deterministic: identical inputs give an identical prompt.
pub fn build_analysis_prompt(resume_text: &str, job_description: &str) -> String {
    format!(
        "{ATS_ANALYSIS_INSTRUCTIONS}\n\nRESUME:\n{resume_text}\n\nJOB DESCRIPTION:\n{job_description}\n\n{JSON_ONLY_REMINDER}"
    )
}
