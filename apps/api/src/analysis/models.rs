//! Analysis input and output types.
//!
//! `AnalysisResult` has no public constructor: the only way to obtain one is a
//! successful [`parse_analysis`](crate::analysis::parser::parse_analysis).

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::analysis::AnalysisError;

/// Resume text and job description for one submission. Both are non-empty.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    resume_text: String,
    job_description: String,
}

impl AnalysisRequest {
    pub fn new(
        resume_text: impl Into<String>,
        job_description: impl Into<String>,
    ) -> Result<Self, AnalysisError> {
        let resume_text = resume_text.into();
        let job_description = job_description.into();
        if resume_text.trim().is_empty() {
            return Err(AnalysisError::InvalidInput {
                field: "resume_text",
            });
        }
        if job_description.trim().is_empty() {
            return Err(AnalysisError::InvalidInput {
                field: "job_description",
            });
        }
        Ok(Self {
            resume_text,
            job_description,
        })
    }

    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }
}

/// Suggestion urgency as reported by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl FromStr for Priority {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse reading of the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    NeedsImprovement,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => ScoreBand::Excellent,
            60..=79 => ScoreBand::Good,
            _ => ScoreBand::NeedsImprovement,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Good => "Good",
            ScoreBand::NeedsImprovement => "Needs Improvement",
        }
    }
}

/// A concrete rewrite of a resume passage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextReplacement {
    pub section: String,
    pub before: String,
    pub after: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub priority: Priority,
    pub category: String,
    pub issue: String,
    pub text: String,
    pub impact: String,
}

/// Per-category points. Maxima: keywords 25, experience 25, skills 20,
/// education 15, formatting 15 (sum 100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub keywords: u8,
    pub experience: u8,
    pub skills: u8,
    pub education: u8,
    pub formatting: u8,
}

/// (wire key, display label, maximum points)
pub const BREAKDOWN_CATEGORIES: [(&str, &str, u8); 5] = [
    ("keywords", "Keywords", 25),
    ("experience", "Experience", 25),
    ("skills", "Skills", 20),
    ("education", "Education", 15),
    ("formatting", "Format", 15),
];

impl ScoreBreakdown {
    /// (label, points, maximum) in display order.
    pub fn entries(&self) -> [(&'static str, u8, u8); 5] {
        let [keywords, experience, skills, education, formatting] = BREAKDOWN_CATEGORIES;
        [
            (keywords.1, self.keywords, keywords.2),
            (experience.1, self.experience, experience.2),
            (skills.1, self.skills, skills.2),
            (education.1, self.education, education.2),
            (formatting.1, self.formatting, formatting.2),
        ]
    }

    pub fn total(&self) -> u32 {
        self.entries().iter().map(|(_, points, _)| *points as u32).sum()
    }
}

/// Fully validated model feedback for one submission.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    score: u8,
    score_band: ScoreBand,
    score_summary: String,
    matched_keywords: Vec<String>,
    missing_keywords: Vec<String>,
    text_replacements: Vec<TextReplacement>,
    suggestions: Vec<Suggestion>,
    score_breakdown: ScoreBreakdown,
    score_explanation: String,
    next_steps: String,
}

/// Every field of an `AnalysisResult`, already validated by the parser.
pub(crate) struct ValidatedFields {
    pub score: u8,
    pub score_summary: String,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub text_replacements: Vec<TextReplacement>,
    pub suggestions: Vec<Suggestion>,
    pub score_breakdown: ScoreBreakdown,
    pub score_explanation: String,
    pub next_steps: String,
}

impl AnalysisResult {
    pub(crate) fn from_validated(fields: ValidatedFields) -> Self {
        Self {
            score: fields.score,
            score_band: ScoreBand::from_score(fields.score),
            score_summary: fields.score_summary,
            matched_keywords: fields.matched_keywords,
            missing_keywords: fields.missing_keywords,
            text_replacements: fields.text_replacements,
            suggestions: fields.suggestions,
            score_breakdown: fields.score_breakdown,
            score_explanation: fields.score_explanation,
            next_steps: fields.next_steps,
        }
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn score_band(&self) -> ScoreBand {
        self.score_band
    }

    pub fn score_summary(&self) -> &str {
        &self.score_summary
    }

    pub fn matched_keywords(&self) -> &[String] {
        &self.matched_keywords
    }

    pub fn missing_keywords(&self) -> &[String] {
        &self.missing_keywords
    }

    pub fn text_replacements(&self) -> &[TextReplacement] {
        &self.text_replacements
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Suggestions of one priority, in the order the model gave them.
    pub fn suggestions_with(&self, priority: Priority) -> impl Iterator<Item = &Suggestion> {
        self.suggestions
            .iter()
            .filter(move |s| s.priority == priority)
    }

    pub fn score_breakdown(&self) -> &ScoreBreakdown {
        &self.score_breakdown
    }

    pub fn score_explanation(&self) -> &str {
        &self.score_explanation
    }

    pub fn next_steps(&self) -> &str {
        &self.next_steps
    }

    /// Splits a "1. ... 2. ..." next-steps string into items. Returns `None`
    /// when the text is not a numbered list.
    pub fn next_step_items(&self) -> Option<Vec<String>> {
        split_numbered_list(&self.next_steps)
    }
}

/// Splits on list markers: `N.` at the start of the text or after whitespace,
/// not followed by a digit, numbered 1, 2, 3, ... in order. Needs at least two
/// markers. Text before the first marker is kept as its own item, so no
/// non-whitespace content is lost.
fn split_numbered_list(text: &str) -> Option<Vec<String>> {
    let bytes = text.as_bytes();
    // (marker start, item start)
    let mut markers: Vec<(usize, usize)> = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let at_boundary = i == 0 || bytes[i - 1].is_ascii_whitespace();
        if !(at_boundary && bytes[i].is_ascii_digit()) {
            i += 1;
            continue;
        }

        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        let dotted = bytes.get(i) == Some(&b'.');
        let digit_follows = bytes.get(i + 1).is_some_and(u8::is_ascii_digit);
        let expected = text[start..i].parse::<usize>().ok() == Some(markers.len() + 1);
        if dotted && !digit_follows && expected {
            markers.push((start, i + 1));
            i += 1;
        }
    }

    if markers.len() < 2 {
        return None;
    }

    let mut items = Vec::with_capacity(markers.len() + 1);
    let lead = text[..markers[0].0].trim();
    if !lead.is_empty() {
        items.push(lead.to_string());
    }
    for (index, &(_, item_start)) in markers.iter().enumerate() {
        let item_end = markers.get(index + 1).map_or(text.len(), |next| next.0);
        let item = text[item_start..item_end].trim();
        if !item.is_empty() {
            items.push(item.to_string());
        }
    }

    Some(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with_next_steps(next_steps: &str) -> AnalysisResult {
        AnalysisResult::from_validated(ValidatedFields {
            score: 50,
            score_summary: "ok".to_string(),
            matched_keywords: vec![],
            missing_keywords: vec![],
            text_replacements: vec![],
            suggestions: vec![],
            score_breakdown: ScoreBreakdown {
                keywords: 10,
                experience: 10,
                skills: 10,
                education: 10,
                formatting: 10,
            },
            score_explanation: "explained".to_string(),
            next_steps: next_steps.to_string(),
        })
    }

    #[test]
    fn test_request_rejects_blank_resume() {
        let err = AnalysisRequest::new("  \n", "Rust engineer").unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InvalidInput {
                field: "resume_text"
            }
        ));
    }

    #[test]
    fn test_request_rejects_blank_job_description() {
        let err = AnalysisRequest::new("Jane Doe", "\t").unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InvalidInput {
                field: "job_description"
            }
        ));
    }

    #[test]
    fn test_request_keeps_text_verbatim() {
        let request = AnalysisRequest::new("  Jane Doe  ", "Rust").unwrap();
        assert_eq!(request.resume_text(), "  Jane Doe  ");
        assert_eq!(request.job_description(), "Rust");
    }

    #[test]
    fn test_priority_from_str_is_case_insensitive() {
        assert_eq!("High".parse::<Priority>(), Ok(Priority::High));
        assert_eq!(" MEDIUM ".parse::<Priority>(), Ok(Priority::Medium));
        assert_eq!("low".parse::<Priority>(), Ok(Priority::Low));
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_priority_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
    }

    #[test]
    fn test_score_band_thresholds() {
        assert_eq!(ScoreBand::from_score(100), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(80), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(79), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(60), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(59), ScoreBand::NeedsImprovement);
        assert_eq!(ScoreBand::from_score(0), ScoreBand::NeedsImprovement);
    }

    #[test]
    fn test_breakdown_entries_and_total() {
        let breakdown = ScoreBreakdown {
            keywords: 18,
            experience: 20,
            skills: 16,
            education: 12,
            formatting: 14,
        };
        let entries = breakdown.entries();
        assert_eq!(entries[0], ("Keywords", 18, 25));
        assert_eq!(entries[4], ("Format", 14, 15));
        assert_eq!(breakdown.total(), 80);
    }

    #[test]
    fn test_next_step_items_numbered() {
        let result = result_with_next_steps(
            "1. Add missing keywords. 2. Quantify achievements. 3. Improve formatting.",
        );
        assert_eq!(
            result.next_step_items().unwrap(),
            vec![
                "Add missing keywords.",
                "Quantify achievements.",
                "Improve formatting."
            ]
        );
    }

    #[test]
    fn test_next_step_items_keeps_plain_numbers() {
        let result = result_with_next_steps("1. Add 3 projects. 2. Mention 10k users.");
        assert_eq!(
            result.next_step_items().unwrap(),
            vec!["Add 3 projects.", "Mention 10k users."]
        );
    }

    #[test]
    fn test_next_step_items_keeps_short_items() {
        let result = result_with_next_steps("1. Add AWS 2. SQL 3. Go");
        assert_eq!(
            result.next_step_items().unwrap(),
            vec!["Add AWS", "SQL", "Go"]
        );
    }

    #[test]
    fn test_next_step_items_ignores_version_numbers() {
        let result =
            result_with_next_steps("Upgrade from Python 2.7 to 3.11 and list Kubernetes 1.29.");
        assert!(result.next_step_items().is_none());

        let result = result_with_next_steps("1. Move to Python 3.11. 2. Mention Windows 10.");
        assert_eq!(
            result.next_step_items().unwrap(),
            vec!["Move to Python 3.11.", "Mention Windows 10."]
        );
    }

    #[test]
    fn test_next_step_items_keeps_leading_text() {
        let result = result_with_next_steps("Focus on keywords: 1. Add AWS. 2. Add Terraform.");
        assert_eq!(
            result.next_step_items().unwrap(),
            vec!["Focus on keywords:", "Add AWS.", "Add Terraform."]
        );
    }

    #[test]
    fn test_next_step_items_not_a_list() {
        let result = result_with_next_steps("Tailor the summary to the role.");
        assert!(result.next_step_items().is_none());
    }

    #[test]
    fn test_suggestions_with_priority_preserves_order() {
        let mut result = result_with_next_steps("x");
        let make = |priority, text: &str| Suggestion {
            priority,
            category: "Keywords".to_string(),
            issue: "issue".to_string(),
            text: text.to_string(),
            impact: "impact".to_string(),
        };
        result.suggestions = vec![
            make(Priority::Low, "c"),
            make(Priority::High, "a"),
            make(Priority::High, "b"),
        ];
        let high: Vec<_> = result
            .suggestions_with(Priority::High)
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(high, vec!["a", "b"]);
    }
}
