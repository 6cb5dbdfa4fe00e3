//! Strict parse of the model's completion into an `AnalysisResult`.
//!
//! Every field declared in the prompt schema is required. Missing or wrongly
//! typed fields are `ResponseParse` errors naming the field (with its path for
//! nested values); out-of-range or malformed values are `Validation` errors.
//! Nothing is clamped or defaulted.

use serde_json::{Map, Value};

use crate::analysis::models::{
    AnalysisResult, Priority, ScoreBreakdown, Suggestion, TextReplacement, ValidatedFields,
};
use crate::analysis::{AnalysisError, RESPONSE_FIELD};
use crate::llm_client::clean_completion;

pub const SCORE_MAX: u8 = 100;

/// Parses raw completion text into a fully populated result.
pub fn parse_analysis(raw: &str) -> Result<AnalysisResult, AnalysisError> {
    let cleaned = clean_completion(raw);
    let value: Value = serde_json::from_str(cleaned).map_err(|e| {
        AnalysisError::response_parse(RESPONSE_FIELD, format!("is not valid JSON: {e}"))
    })?;
    let root = match &value {
        Value::Object(map) => Fields::root(map),
        _ => {
            return Err(AnalysisError::response_parse(
                RESPONSE_FIELD,
                "is not a JSON object",
            ))
        }
    };

    let score = root.bounded_integer("ats_score", SCORE_MAX)?;
    let score_summary = root.text("score_summary")?;
    let matched_keywords = root.keywords("matched_keywords")?;
    let missing_keywords = root.keywords("missing_keywords")?;
    let text_replacements = root.objects("text_replacements", parse_replacement)?;
    let suggestions = root.objects("detailed_suggestions", parse_suggestion)?;
    let score_breakdown = parse_breakdown(&root.object("score_breakdown")?)?;
    let score_explanation = root.text("score_explanation")?;
    let next_steps = root.text("next_steps")?;

    Ok(AnalysisResult::from_validated(ValidatedFields {
        score,
        score_summary,
        matched_keywords,
        missing_keywords,
        text_replacements,
        suggestions,
        score_breakdown,
        score_explanation,
        next_steps,
    }))
}

fn parse_replacement(fields: &Fields<'_>) -> Result<TextReplacement, AnalysisError> {
    Ok(TextReplacement {
        section: fields.text("section")?,
        before: fields.text("original_text")?,
        after: fields.text("improved_text")?,
        reason: fields.text("reason")?,
    })
}

fn parse_suggestion(fields: &Fields<'_>) -> Result<Suggestion, AnalysisError> {
    let priority_text = fields.text("priority")?;
    let priority = priority_text.parse::<Priority>().map_err(|_| {
        AnalysisError::validation(
            fields.path("priority"),
            format!("must be one of High, Medium, Low, got '{priority_text}'"),
        )
    })?;

    Ok(Suggestion {
        priority,
        category: fields.text("category")?,
        issue: fields.text("issue")?,
        text: fields.text("solution")?,
        impact: fields.text("expected_impact")?,
    })
}

fn parse_breakdown(fields: &Fields<'_>) -> Result<ScoreBreakdown, AnalysisError> {
    Ok(ScoreBreakdown {
        keywords: fields.bounded_integer("keywords", 25)?,
        experience: fields.bounded_integer("experience", 25)?,
        skills: fields.bounded_integer("skills", 20)?,
        education: fields.bounded_integer("education", 15)?,
        formatting: fields.bounded_integer("formatting", 15)?,
    })
}

/// A JSON object plus the path it was reached by, for error messages.
struct Fields<'a> {
    map: &'a Map<String, Value>,
    prefix: String,
}

impl<'a> Fields<'a> {
    fn root(map: &'a Map<String, Value>) -> Self {
        Self {
            map,
            prefix: String::new(),
        }
    }

    fn path(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.prefix, key)
        }
    }

    fn required(&self, key: &str) -> Result<&'a Value, AnalysisError> {
        match self.map.get(key) {
            Some(Value::Null) | None => Err(AnalysisError::response_parse(
                self.path(key),
                "is missing from the response",
            )),
            Some(value) => Ok(value),
        }
    }

    fn wrong_type(&self, key: &str, expected: &str, found: &Value) -> AnalysisError {
        AnalysisError::response_parse(
            self.path(key),
            format!("must be {expected}, found {}", type_name(found)),
        )
    }

    /// A non-empty string, trimmed.
    fn text(&self, key: &str) -> Result<String, AnalysisError> {
        match self.required(key)? {
            Value::String(s) if s.trim().is_empty() => Err(AnalysisError::validation(
                self.path(key),
                "must not be empty",
            )),
            Value::String(s) => Ok(s.trim().to_string()),
            other => Err(self.wrong_type(key, "a string", other)),
        }
    }

    fn object(&self, key: &str) -> Result<Fields<'a>, AnalysisError> {
        match self.required(key)? {
            Value::Object(map) => Ok(Fields {
                map,
                prefix: self.path(key),
            }),
            other => Err(self.wrong_type(key, "an object", other)),
        }
    }

    fn array(&self, key: &str) -> Result<&'a Vec<Value>, AnalysisError> {
        match self.required(key)? {
            Value::Array(items) => Ok(items),
            other => Err(self.wrong_type(key, "an array", other)),
        }
    }

    /// An array of objects, each converted by `parse_item`. Order is preserved.
    fn objects<T>(
        &self,
        key: &str,
        parse_item: impl Fn(&Fields<'_>) -> Result<T, AnalysisError>,
    ) -> Result<Vec<T>, AnalysisError> {
        let base = self.path(key);
        self.array(key)?
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(map) => parse_item(&Fields {
                    map,
                    prefix: format!("{base}[{index}]"),
                }),
                other => Err(AnalysisError::response_parse(
                    format!("{base}[{index}]"),
                    format!("must be an object, found {}", type_name(other)),
                )),
            })
            .collect()
    }

    /// An array of strings, trimmed, blanks dropped, de-duplicated
    /// case-insensitively keeping the first spelling.
    fn keywords(&self, key: &str) -> Result<Vec<String>, AnalysisError> {
        let base = self.path(key);
        let mut seen: Vec<String> = Vec::new();
        let mut keywords = Vec::new();

        for (index, item) in self.array(key)?.iter().enumerate() {
            let keyword = match item {
                Value::String(s) => s.trim(),
                other => {
                    return Err(AnalysisError::response_parse(
                        format!("{base}[{index}]"),
                        format!("must be a string, found {}", type_name(other)),
                    ))
                }
            };
            if keyword.is_empty() {
                continue;
            }
            let folded = keyword.to_lowercase();
            if !seen.contains(&folded) {
                seen.push(folded);
                keywords.push(keyword.to_string());
            }
        }

        Ok(keywords)
    }

    /// An integer in `0..=max`. Integer-valued numbers (`73.0`) and numeric
    /// strings (`"73"`) are accepted; anything else is rejected, never clamped.
    fn bounded_integer(&self, key: &str, max: u8) -> Result<u8, AnalysisError> {
        let field = self.path(key);
        let value = match self.required(key)? {
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => i,
                (None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => f as i64,
                _ => {
                    return Err(AnalysisError::validation(
                        field,
                        format!("must be an integer, got {n}"),
                    ))
                }
            },
            Value::String(s) => s.trim().parse::<i64>().map_err(|_| {
                AnalysisError::validation(&field, format!("must be an integer, got '{s}'"))
            })?,
            other => return Err(self.wrong_type(key, "an integer", other)),
        };

        if !(0..=i64::from(max)).contains(&value) {
            return Err(AnalysisError::validation(
                field,
                format!("must be between 0 and {max}, got {value}"),
            ));
        }
        Ok(value as u8)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
