//! PDF text extraction using pdf-extract.

use std::any::Any;
use std::panic;

use tracing::debug;

use super::{ExtractError, ResumeFormat, TextExtractor};

/// Extracts text page by page and joins pages with a blank line.
///
/// Pages without a text layer (scanned images) contribute nothing; whether the
/// document as a whole has any text is decided by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        // pdf-extract panics on some malformed inputs instead of returning an error.
        let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
            .map_err(|payload| parse_error(panic_message(payload.as_ref())))?
            .map_err(|e| parse_error(e.to_string()))?;

        for (index, page) in pages.iter().enumerate() {
            debug!("PDF page {}: {} characters", index + 1, page.trim().len());
        }

        Ok(join_pages(&pages))
    }
}

fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| page.trim())
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn parse_error(cause: String) -> ExtractError {
    ExtractError::Parse {
        format: ResumeFormat::Pdf,
        cause,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "PDF decoder aborted".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::fixtures;

    #[test]
    fn test_join_pages_skips_empty_pages() {
        let pages = vec![
            "  Page one\n".to_string(),
            String::new(),
            "Page three".to_string(),
        ];
        assert_eq!(join_pages(&pages), "Page one\n\nPage three");
    }

    #[test]
    fn test_join_pages_all_empty() {
        assert_eq!(join_pages(&[String::new(), " \n ".to_string()]), "");
    }

    #[test]
    fn test_partially_extractable_pdf_keeps_text_pages() {
        let bytes = fixtures::pdf_with_pages(&["", "Kubernetes"]);
        let text = PdfExtractor.extract(&bytes).unwrap();
        assert!(text.contains("Kubernetes"), "got: {text:?}");
    }

    #[test]
    fn test_garbage_bytes_are_a_parse_error() {
        let result = PdfExtractor.extract(b"definitely not a pdf");
        assert!(matches!(
            result,
            Err(ExtractError::Parse {
                format: ResumeFormat::Pdf,
                ..
            })
        ));
    }

    #[test]
    fn test_panic_message_variants() {
        let boxed: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(boxed.as_ref()), "static message");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(panic_message(boxed.as_ref()), "owned message");
        let boxed: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(boxed.as_ref()), "PDF decoder aborted");
    }
}
