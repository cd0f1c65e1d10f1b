//! Text and image extraction from source documents.
//!
//! Both extractors implement the same contract: return the document's
//! native text (newline-joined, in document order), every embedded image as
//! raw bytes, and a record of anything that had to be skipped. One function
//! per [`DocumentFormat`] variant; [`extract`] is the only dispatch point.
//!
//! Failure policy: a document that cannot be opened at all is fatal, but a
//! single page or image that fails is recorded as an [`ItemSkip`] and the
//! scan continues. A half-extracted document is still worth analysing; a
//! half-opened one is not.

pub mod docx;
pub mod pdf;

use crate::error::{AnalyzeError, ItemSkip};
use crate::pipeline::input::DocumentFormat;
use std::path::Path;

/// Everything pulled out of a source document in one pass.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Native text, page/paragraph texts joined with newlines in document
    /// order.
    pub text: String,
    /// Raw bytes of every embedded image, in document order for PDF and in
    /// relationship-table order for DOCX.
    pub images: Vec<Vec<u8>>,
    /// Items that failed and were skipped, in occurrence order.
    pub skipped: Vec<ItemSkip>,
    /// Page count (PDF only; 0 for DOCX, which has no fixed pagination).
    pub pages: usize,
}

/// Extract text and images from `path` using the extractor for `format`.
pub fn extract(path: &Path, format: DocumentFormat) -> Result<Extraction, AnalyzeError> {
    match format {
        DocumentFormat::Pdf => pdf::extract_pdf(path),
        DocumentFormat::Docx => docx::extract_docx(path),
    }
}
