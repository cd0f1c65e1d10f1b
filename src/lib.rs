//! # doc2report
//!
//! Analyze expert-report documents (PDF or DOCX) with OCR and an LLM,
//! producing a formatted DOCX findings report.
//!
//! ## Why this crate?
//!
//! Expert reports are a mix of machine-readable text and scanned
//! attachments — stamped pages, photographed annexes, signature sheets.
//! Reading only the native text misses the scans; rasterising everything
//! throws away text that is already clean. This crate extracts both
//! channels separately, OCRs only the embedded images, and hands the model
//! one combined, complete view of the document.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF / DOCX
//!  │
//!  ├─ 1. Input      validate the path, detect the format by suffix
//!  ├─ 2. Extract    native text + embedded images (lopdf / docx-rs)
//!  ├─ 3. Recognize  OCR over the images (tesseract, configurable languages)
//!  ├─ 4. Combine    native text + OCR text
//!  ├─ 5. Respond    one chat-completion call (system = prompt, user = text)
//!  └─ 6. Report     DOCX with a heading and one paragraph per reply line
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use doc2report::{analyze_to_file, AnalysisConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Needs OPENAI_API_KEY in the environment.
//!     let config = AnalysisConfig::builder()
//!         .model("gpt-4")
//!         .ocr_languages("rus+eng")
//!         .system_prompt("List every deficiency found in the report.")
//!         .build()?;
//!     let output = analyze_to_file("expertise.pdf", "findings.docx", &config).await?;
//!     eprintln!(
//!         "{} images OCRed, {} items skipped, reply {} chars",
//!         output.stats.images_recognized,
//!         output.stats.items_skipped,
//!         output.stats.response_chars
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `doc2report` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only
//! deps:
//! ```toml
//! doc2report = { version = "0.3", default-features = false }
//! ```
//!
//! ## Failure model
//!
//! Fatal conditions (bad input, unsupported suffix, no OCR engine, no API
//! key, failed chat call) abort the run; nothing is written. A single page
//! or image that fails is skipped, recorded in
//! [`AnalysisOutput::skipped`], and the run continues.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{analyze, analyze_sync, analyze_to_file};
pub use config::{AnalysisConfig, AnalysisConfigBuilder};
pub use error::{AnalyzeError, ItemSkip};
pub use output::{AnalysisOutput, AnalysisStats};
pub use pipeline::input::DocumentFormat;
pub use pipeline::llm::{build_messages, ChatMessage, ChatProvider, OpenAiChat, Role};
pub use pipeline::recognize::{OcrEngine, TesseractEngine};
pub use prompts::{load_prompt, DEFAULT_PROMPT_FILE};
