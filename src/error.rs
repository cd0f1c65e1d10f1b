//! Error types for the doc2report library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`AnalyzeError`] — **Fatal**: the analysis cannot proceed at all
//!   (missing input, unsupported format, OCR engine unavailable, API key
//!   absent, the chat API call failed). Returned as `Err(AnalyzeError)`
//!   from the top-level `analyze*` functions. No report file is ever
//!   written once a fatal error occurs.
//!
//! * [`ItemSkip`] — **Non-fatal**: one page's text, one embedded image, or
//!   one OCR item failed while everything else is fine. Collected into
//!   [`crate::pipeline::extract::Extraction`] and
//!   [`crate::pipeline::recognize::Recognition`] so callers can inspect
//!   what was dropped instead of losing that information to a silent
//!   `continue`.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the doc2report library.
///
/// Item-level failures use [`ItemSkip`] and are carried in the stage
/// results rather than propagated here.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("input file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    /// The input suffix is neither `.pdf` nor `.docx`.
    #[error("unsupported input format '{extension}' — expected .pdf or .docx")]
    UnsupportedFormat { extension: String },

    // ── Document errors ───────────────────────────────────────────────────
    /// The PDF could not be opened or its page tree is unreadable.
    #[error("failed to parse PDF '{path}': {detail}")]
    PdfParse { path: PathBuf, detail: String },

    /// The DOCX could not be opened or its document part is unreadable.
    #[error("failed to parse DOCX '{path}': {detail}")]
    DocxParse { path: PathBuf, detail: String },

    // ── OCR errors ────────────────────────────────────────────────────────
    /// The OCR engine could not be initialised for the requested languages.
    #[error(
        "OCR engine unavailable for languages '{languages}': {detail}\n\
Install tesseract and the matching language data (e.g. tesseract-ocr-rus), \
or point TESSDATA_PREFIX at your tessdata directory."
    )]
    OcrUnavailable { languages: String, detail: String },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// `OPENAI_API_KEY` is not set in the process environment.
    #[error("OPENAI_API_KEY is not set\nExport it before running: export OPENAI_API_KEY=sk-...")]
    ApiKeyMissing,

    /// The chat API answered with a non-success status.
    #[error("chat API request failed (status {status}): {detail}")]
    ApiStatus { status: u16, detail: String },

    /// Transport-level HTTP failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The chat API reply was not valid JSON of the expected shape.
    #[error("failed to parse chat API response: {0}")]
    Json(#[from] serde_json::Error),

    /// The chat API reply carried no choices.
    #[error("empty response from model '{model}'")]
    EmptyResponse { model: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output report file.
    #[error("failed to write report '{path}': {detail}")]
    ReportWrite { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// A non-fatal, per-item failure recorded during extraction or OCR.
///
/// Recording these instead of silently continuing keeps the run-level
/// behaviour (skip and carry on) while making the drop visible in logs
/// and in [`crate::output::AnalysisStats`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemSkip {
    /// Text extraction for one PDF page failed; an empty string was used.
    #[error("page {page}: text extraction failed: {detail}")]
    PageText { page: u32, detail: String },

    /// One embedded PDF image could not be read.
    #[error("page {page}, image '{name}': {detail}")]
    PdfImage {
        page: u32,
        name: String,
        detail: String,
    },

    /// One DOCX image relationship could not be resolved.
    #[error("relationship '{id}': {detail}")]
    DocxImage { id: String, detail: String },

    /// One image blob could not be decoded for OCR.
    #[error("image {index}: decode failed: {detail}")]
    ImageDecode { index: usize, detail: String },

    /// The OCR engine failed on one image.
    #[error("image {index}: recognition failed: {detail}")]
    Recognition { index: usize, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_display_names_suffix() {
        let e = AnalyzeError::UnsupportedFormat {
            extension: ".txt".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains(".txt"), "got: {msg}");
        assert!(msg.contains(".pdf"));
    }

    #[test]
    fn ocr_unavailable_display_names_languages() {
        let e = AnalyzeError::OcrUnavailable {
            languages: "rus+eng".into(),
            detail: "no tessdata".into(),
        };
        assert!(e.to_string().contains("rus+eng"));
        assert!(e.to_string().contains("no tessdata"));
    }

    #[test]
    fn api_status_display() {
        let e = AnalyzeError::ApiStatus {
            status: 429,
            detail: "rate limit".into(),
        };
        assert!(e.to_string().contains("429"));
    }

    #[test]
    fn item_skip_display_carries_position() {
        let skip = ItemSkip::PageText {
            page: 3,
            detail: "bad content stream".into(),
        };
        assert!(skip.to_string().contains("page 3"));

        let skip = ItemSkip::ImageDecode {
            index: 0,
            detail: "not an image".into(),
        };
        assert!(skip.to_string().contains("image 0"));
    }
}
