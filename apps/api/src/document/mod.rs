//! Document I/O: text extraction from uploads and DOCX export.

pub mod export;
pub mod extract;

use serde::Serialize;
use thiserror::Error;

pub use export::{export_docx, export_redline_docx};
pub use extract::extract_upload;

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum DocumentError {
    /// The bytes could not be parsed as the declared format.
    #[error("{0}")]
    Format(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DOCX write error: {0}")]
    Write(String),
}

/// Declared format of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Resolves the format from the upload's file name, falling back to its MIME type.
    pub fn from_upload(file_name: Option<&str>, content_type: Option<&str>) -> Option<Self> {
        let by_extension = file_name.and_then(|name| {
            let lower = name.to_lowercase();
            if lower.ends_with(".pdf") {
                Some(DocumentFormat::Pdf)
            } else if lower.ends_with(".docx") {
                Some(DocumentFormat::Docx)
            } else {
                None
            }
        });

        by_extension.or_else(|| match content_type {
            Some(PDF_MIME) => Some(DocumentFormat::Pdf),
            Some(DOCX_MIME) => Some(DocumentFormat::Docx),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension_is_case_insensitive() {
        assert_eq!(
            DocumentFormat::from_upload(Some("Proposal.PDF"), None),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::from_upload(Some("scope.docx"), Some(PDF_MIME)),
            Some(DocumentFormat::Docx)
        );
    }

    #[test]
    fn test_format_falls_back_to_mime() {
        assert_eq!(
            DocumentFormat::from_upload(Some("upload"), Some(DOCX_MIME)),
            Some(DocumentFormat::Docx)
        );
    }

    #[test]
    fn test_unsupported_format_is_none() {
        assert_eq!(
            DocumentFormat::from_upload(Some("notes.txt"), Some("text/plain")),
            None
        );
        assert_eq!(DocumentFormat::from_upload(None, None), None);
    }
}
