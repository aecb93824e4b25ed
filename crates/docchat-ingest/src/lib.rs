//! Text extraction for uploaded documents.
//!
//! Each supported format has one single-pass extractor that turns the raw
//! upload bytes into a plain-text string:
//! - PDF → page text concatenated in page order (requires the `pdf` feature / mupdf)
//! - DOCX → body paragraphs in document order, each followed by `\n`
//! - anything else → UTF-8 decode
//!
//! The extractor is chosen from the upload's declared MIME type; every type
//! that is neither the PDF nor the DOCX MIME string falls back to the text
//! extractor.

use std::path::Path;

use thiserror::Error;

pub mod docx;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod text;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const TEXT_MIME: &str = "text/plain";

/// The extractor family selected for an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Text,
}

impl DocumentKind {
    /// Select the extractor for a declared MIME type.
    ///
    /// Parameters such as `; charset=utf-8` are ignored. Unknown types map
    /// to [`DocumentKind::Text`].
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime.split(';').next().unwrap_or("").trim();
        if essence.eq_ignore_ascii_case(PDF_MIME) {
            DocumentKind::Pdf
        } else if essence.eq_ignore_ascii_case(DOCX_MIME) {
            DocumentKind::Docx
        } else {
            DocumentKind::Text
        }
    }

    /// Guess the kind from a file extension, for callers that have a path
    /// but no declared MIME type (e.g. the CLI).
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "pdf" => DocumentKind::Pdf,
            "docx" => DocumentKind::Docx,
            _ => DocumentKind::Text,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => PDF_MIME,
            DocumentKind::Docx => DOCX_MIME,
            DocumentKind::Text => TEXT_MIME,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "PDF",
            DocumentKind::Docx => "DOCX",
            DocumentKind::Text => "TXT",
        }
    }
}

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("error extracting PDF: {0}")]
    Pdf(String),
    #[error("error extracting DOCX: {0}")]
    Docx(String),
    #[error("error extracting TXT: {0}")]
    Text(#[from] std::str::Utf8Error),
    #[cfg(not(feature = "pdf"))]
    #[error("error extracting PDF: support not compiled in (enable the `pdf` feature of docchat-ingest)")]
    NoPdfSupport,
}

impl IngestError {
    /// The extractor that produced this error.
    pub fn kind(&self) -> DocumentKind {
        match self {
            IngestError::Pdf(_) => DocumentKind::Pdf,
            IngestError::Docx(_) => DocumentKind::Docx,
            IngestError::Text(_) => DocumentKind::Text,
            #[cfg(not(feature = "pdf"))]
            IngestError::NoPdfSupport => DocumentKind::Pdf,
        }
    }
}

/// Extract plain text from `data`, dispatching on the declared MIME type.
pub fn extract(data: &[u8], mime: &str) -> Result<String, IngestError> {
    extract_kind(data, DocumentKind::from_mime(mime))
}

/// Extract plain text from `data` with an explicitly chosen extractor.
pub fn extract_kind(data: &[u8], kind: DocumentKind) -> Result<String, IngestError> {
    tracing::debug!(kind = kind.label(), bytes = data.len(), "extracting document text");

    match kind {
        DocumentKind::Pdf => extract_pdf(data),
        DocumentKind::Docx => docx::extract_docx(data),
        DocumentKind::Text => text::extract_text(data),
    }
}

#[cfg(feature = "pdf")]
fn extract_pdf(data: &[u8]) -> Result<String, IngestError> {
    pdf::extract_pdf(data)
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf(_data: &[u8]) -> Result<String, IngestError> {
    Err(IngestError::NoPdfSupport)
}
