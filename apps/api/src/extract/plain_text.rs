use super::{ExtractError, ResumeFormat, TextExtractor};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const UTF16_LE_BOM: &[u8] = b"\xFF\xFE";
const UTF16_BE_BOM: &[u8] = b"\xFE\xFF";

/// Decodes UTF-16 when a BOM says so, otherwise UTF-8 with a Latin-1 fallback
/// for legacy encodings. NUL bytes without a UTF-16 BOM mean the file is not text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        if let Some(units) = bytes.strip_prefix(UTF16_LE_BOM) {
            return decode_utf16(units, u16::from_le_bytes);
        }
        if let Some(units) = bytes.strip_prefix(UTF16_BE_BOM) {
            return decode_utf16(units, u16::from_be_bytes);
        }
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        if bytes.contains(&0) {
            return Err(ExtractError::Parse {
                format: ResumeFormat::PlainText,
                cause: "file contains binary data".to_string(),
            });
        }

        Ok(match std::str::from_utf8(bytes) {
            Ok(text) => text.to_owned(),
            // Every byte maps to the code point of the same value in Latin-1.
            Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
        })
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String, ExtractError> {
    let parse_error = |cause: &str| ExtractError::Parse {
        format: ResumeFormat::PlainText,
        cause: cause.to_string(),
    };
    if bytes.len() % 2 != 0 {
        return Err(parse_error("truncated UTF-16 text"));
    }

    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|_| parse_error("invalid UTF-16 text"))
}
