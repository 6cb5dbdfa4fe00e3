//! Resume text extraction.
//!
//! A `ResumeFormat` is resolved from the uploaded filename and maps to exactly one
//! `TextExtractor`. Extraction is synchronous and pure with respect to its input;
//! HTTP handlers run it on the blocking pool.

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod docx;
pub mod pdf;
pub mod plain_text;

#[cfg(test)]
pub(crate) mod fixtures;

use self::docx::DocxExtractor;
use self::pdf::PdfExtractor;
use self::plain_text::PlainTextExtractor;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file format: '{extension}' (supported: pdf, docx, txt)")]
    UnsupportedFormat { extension: String },

    #[error("Uploaded file is empty")]
    EmptyFile,

    #[error("No extractable text found in {format} file. The file might be image-based or blank.")]
    NoExtractableText { format: ResumeFormat },

    #[error("Failed to parse {format} file: {cause}")]
    Parse { format: ResumeFormat, cause: String },
}

/// Declared format of an uploaded resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeFormat {
    Pdf,
    Docx,
    PlainText,
}

impl ResumeFormat {
    /// Resolves a format from a bare extension (case-insensitive, leading dot allowed).
    pub fn from_extension(extension: &str) -> Result<Self, ExtractError> {
        let normalized = extension.trim().trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "txt" => Ok(Self::PlainText),
            _ => Err(ExtractError::UnsupportedFormat {
                extension: normalized,
            }),
        }
    }

    /// Resolves a format from the text after the last `.` of a filename.
    pub fn from_filename(filename: &str) -> Result<Self, ExtractError> {
        match filename.rsplit_once('.') {
            Some((_, extension)) => Self::from_extension(extension),
            None => Err(ExtractError::UnsupportedFormat {
                extension: String::new(),
            }),
        }
    }

    fn extractor(&self) -> &'static dyn TextExtractor {
        match self {
            Self::Pdf => &PdfExtractor,
            Self::Docx => &DocxExtractor,
            Self::PlainText => &PlainTextExtractor,
        }
    }
}

impl fmt::Display for ResumeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
            Self::PlainText => "TXT",
        })
    }
}

/// The single capability every format handler implements.
///
/// Implementations return raw text; normalization and the empty-text check are
/// applied uniformly by [`extract_text`].
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// An uploaded resume, alive for the duration of one request.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    filename: String,
    format: ResumeFormat,
    bytes: Bytes,
}

impl ResumeDocument {
    pub fn new(filename: impl Into<String>, bytes: Bytes) -> Result<Self, ExtractError> {
        let filename = filename.into();
        let format = ResumeFormat::from_filename(&filename)?;
        Ok(Self {
            filename,
            format,
            bytes,
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn format(&self) -> ResumeFormat {
        self.format
    }

    pub fn extract_text(&self) -> Result<String, ExtractError> {
        extract_text(&self.bytes, self.format)
    }
}

/// Extracts normalized plain text from `bytes` in the given `format`.
///
/// Fails with `EmptyFile` on empty input and `NoExtractableText` when the
/// normalized result is blank.
pub fn extract_text(bytes: &[u8], format: ResumeFormat) -> Result<String, ExtractError> {
    if bytes.is_empty() {
        return Err(ExtractError::EmptyFile);
    }

    let raw = format.extractor().extract(bytes)?;
    let text = normalize_text(&raw);

    debug!(
        "Extracted {} characters from {} bytes of {}",
        text.chars().count(),
        bytes.len(),
        format
    );

    if text.is_empty() {
        return Err(ExtractError::NoExtractableText { format });
    }
    Ok(text)
}

/// Unifies line endings, strips trailing whitespace per line, and collapses
/// runs of blank lines to a single blank line.
pub fn normalize_text(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");

    let mut out = String::with_capacity(unified.len());
    let mut previous_blank = false;
    for line in unified.lines() {
        let line = line.trim_end();
        let blank = line.is_empty();
        if blank && previous_blank {
            continue;
        }
        out.push_str(line);
        out.push('\n');
        previous_blank = blank;
    }

    out.trim().to_string()
}
