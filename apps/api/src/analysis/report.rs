//! Flattened plain-text report for copy/export.
//!
//! Section order is fixed: overall score, score breakdown, matched keywords,
//! missing keywords, text replacements, detailed suggestions, score breakdown
//! explanation, next steps. Empty replacement/suggestion lists omit their section.

use crate::analysis::models::{AnalysisResult, Priority};

pub fn render_text_report(result: &AnalysisResult) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("Overall ATS Score".to_string());
    lines.push(format!(
        "{}/100 ({})",
        result.score(),
        result.score_band().label()
    ));
    lines.push(result.score_summary().to_string());
    lines.push(String::new());

    lines.push("Score Breakdown".to_string());
    for (label, points, max) in result.score_breakdown().entries() {
        lines.push(format!("{label}: {points}/{max}"));
    }
    lines.push(String::new());

    push_keyword_section(
        &mut lines,
        "Matched Keywords",
        result.matched_keywords(),
        "No specific matched keywords identified",
    );
    push_keyword_section(
        &mut lines,
        "Missing Critical Keywords",
        result.missing_keywords(),
        "No missing keywords identified",
    );

    if !result.text_replacements().is_empty() {
        lines.push("Text Replacements (Resume Improvements)".to_string());
        for (i, replacement) in result.text_replacements().iter().enumerate() {
            lines.push(format!("{}. Section: {}", i + 1, replacement.section));
            lines.push(format!("   Current Text: {}", replacement.before));
            lines.push(format!("   Improved Text: {}", replacement.after));
            lines.push(format!("   Why this helps: {}", replacement.reason));
            lines.push(String::new());
        }
    }

    if !result.suggestions().is_empty() {
        lines.push("Detailed Suggestions".to_string());
        for priority in Priority::ALL {
            let mut group = result.suggestions_with(priority).peekable();
            if group.peek().is_none() {
                continue;
            }
            lines.push(format!("{priority} Priority:"));
            for suggestion in group {
                lines.push(format!("• Category: {}", suggestion.category));
                lines.push(format!("  Issue: {}", suggestion.issue));
                lines.push(format!("  Suggested Fix: {}", suggestion.text));
                lines.push(format!("  Expected Impact: {}", suggestion.impact));
                lines.push(String::new());
            }
        }
    }

    lines.push("Score Breakdown Explanation".to_string());
    lines.push(result.score_explanation().to_string());
    lines.push(String::new());

    lines.push("Next Steps".to_string());
    match result.next_step_items() {
        Some(items) => lines.extend(items.into_iter().map(|item| format!("• {item}"))),
        None => lines.push(result.next_steps().to_string()),
    }

    lines.join("\n")
}

fn push_keyword_section(lines: &mut Vec<String>, title: &str, keywords: &[String], empty: &str) {
    lines.push(title.to_string());
    if keywords.is_empty() {
        lines.push(format!("• {empty}"));
    } else {
        lines.extend(keywords.iter().map(|keyword| format!("• {keyword}")));
    }
    lines.push(String::new());
}
