//! Text extractor trait and the plain-text implementation

use crate::{Error, Result};

/// Trait for extracting raw text from an uploaded file
///
/// Binary container formats (PDF, DOCX) are handled by external
/// implementations; the core only defines the contract and ships the trivial
/// plain-text case.
pub trait TextExtractor: Send + Sync {
    /// Extract raw text from file bytes
    ///
    /// Fails with `Error::UnsupportedFormat` for unknown MIME types and
    /// `Error::Extraction` when the bytes cannot be decoded.
    fn extract(&self, bytes: &[u8], mime_type: &str) -> Result<String>;
}

/// Extractor for `text/plain` uploads
///
/// Decodes UTF-8 and falls back to Latin-1 when the bytes are not valid
/// UTF-8, so legacy text files still ingest.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8], mime_type: &str) -> Result<String> {
        if mime_type != "text/plain" {
            return Err(Error::UnsupportedFormat(format!(
                "unsupported MIME type: {}",
                mime_type
            )));
        }

        match std::str::from_utf8(bytes) {
            Ok(text) => Ok(text.to_string()),
            // Latin-1: every byte maps directly to the code point of the
            // same value.
            Err(_) => Ok(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}
