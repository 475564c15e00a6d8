//! Document Text Extractor: bounded plain-text excerpt of an uploaded PDF or DOCX.

use bytes::Bytes;
use tracing::debug;

use super::export::read_docx_paragraphs;
use super::{DocumentError, DocumentFormat};

/// Upper bound on the extracted excerpt, in characters.
pub const MAX_SOURCE_CHARS: usize = 8000;

/// Extracts text from `bytes` as the declared `format` and truncates it to
/// `MAX_SOURCE_CHARS` characters.
pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> Result<String, DocumentError> {
    let text = match format {
        // Pages without a text layer contribute nothing rather than failing the document.
        DocumentFormat::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| DocumentError::Format(format!("invalid PDF: {e}")))?,
        DocumentFormat::Docx => read_docx_paragraphs(bytes)?.join("\n"),
    };

    Ok(truncate_chars(&text, MAX_SOURCE_CHARS))
}

/// Runs `extract_text` on the blocking pool.
///
/// The PDF parser can panic on malformed input; a panic is reported as a
/// format error so the request fails cleanly.
pub async fn extract_upload(bytes: Bytes, format: DocumentFormat) -> Result<String, DocumentError> {
    let size = bytes.len();
    let text = tokio::task::spawn_blocking(move || extract_text(&bytes, format))
        .await
        .map_err(|e| {
            DocumentError::Format(format!("{format:?} parser aborted on this file: {e}"))
        })??;

    debug!(
        "Extracted {} chars from {:?} upload ({} bytes)",
        text.chars().count(),
        format,
        size
    );
    Ok(text)
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
