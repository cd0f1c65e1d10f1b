//! Pipeline stages for document analysis.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different OCR backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ recognize ──▶ llm ──▶ report
//! (path)   (text+imgs)  (OCR text)   (chat)   (DOCX)
//! ```
//!
//! 1. [`input`]     — validate the path and detect the document format once
//! 2. [`extract`]   — pull native text and embedded images out of the
//!    document; one extractor per format, same contract
//! 3. [`recognize`] — OCR over the extracted images; runs alongside
//!    extraction in `spawn_blocking` because both are CPU-bound
//! 4. [`llm`]       — the single chat-completion call; the only stage with
//!    network I/O
//! 5. [`report`]    — write the reply into a formatted DOCX

pub mod extract;
pub mod input;
pub mod llm;
pub mod recognize;
pub mod report;
