//! Result types returned by the analysis entry points.

use crate::error::ItemSkip;

/// The result of a complete analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    /// The model's reply, verbatim.
    pub response: String,

    /// Per-item skips collected during extraction and OCR, in occurrence
    /// order. Empty on a fully clean run.
    pub skipped: Vec<ItemSkip>,

    /// Run statistics.
    pub stats: AnalysisStats,
}

/// Statistics about an analysis run.
#[derive(Debug, Clone, Default)]
pub struct AnalysisStats {
    /// Pages in the source document (PDF only; 0 for DOCX).
    pub pages: usize,
    /// Characters of native text extracted from the document.
    pub native_text_chars: usize,
    /// Embedded images found in the document.
    pub images_found: usize,
    /// Images that produced non-empty OCR text.
    pub images_recognized: usize,
    /// Items skipped across extraction and OCR.
    pub items_skipped: usize,
    /// Characters of the model's reply.
    pub response_chars: usize,
    /// Wall-clock time spent extracting text and images.
    pub extract_duration_ms: u64,
    /// Wall-clock time spent in OCR.
    pub ocr_duration_ms: u64,
    /// Wall-clock time spent waiting on the chat API.
    pub llm_duration_ms: u64,
    /// Total wall-clock time of the run.
    pub total_duration_ms: u64,
}
