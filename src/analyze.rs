//! Analysis entry points: one linear pass from document to model reply.
//!
//! ## Execution shape
//!
//! The pipeline is strictly sequential — each stage completes before the
//! next starts, and there is no fan-out over pages or images even though
//! they are independent. The stages are cheap relative to the single chat
//! call, and a deterministic, single-pass run is easier to reason about
//! than a concurrent one for an audit-style tool.
//!
//! Extraction and OCR are CPU-bound and run inside `spawn_blocking`; the
//! OCR engine is initialised *first* inside that task so a missing
//! tesseract install fails before any document work is done. The engine
//! stays inside the blocking task because `LepTess` holds raw pointers and
//! cannot cross thread boundaries.

use crate::config::AnalysisConfig;
use crate::error::AnalyzeError;
use crate::output::{AnalysisOutput, AnalysisStats};
use crate::pipeline::extract::{self, Extraction};
use crate::pipeline::input::{self, DocumentFormat};
use crate::pipeline::llm::{self, ChatProvider, OpenAiChat};
use crate::pipeline::recognize::{self, Recognition, TesseractEngine};
use crate::pipeline::report;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Analyse a document and return the model's reply.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input` — path to a PDF or DOCX file
/// * `config` — analysis configuration
///
/// # Errors
/// Returns `Err(AnalyzeError)` for every fatal condition: missing or
/// unreadable input, unsupported suffix, unavailable OCR engine, missing
/// API key, or a failed chat call. Per-page and per-image failures are not
/// fatal; they are collected into `output.skipped`.
pub async fn analyze(
    input: impl AsRef<str>,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, AnalyzeError> {
    let total_start = Instant::now();
    let input = input.as_ref();
    info!("Starting analysis: {}", input);

    // ── Step 1: Validate input, detect format ────────────────────────────
    let (path, format) = input::resolve_input(input)?;

    // ── Step 2+3: Extract, then OCR (blocking stages) ────────────────────
    let (extraction, recognition, extract_ms, ocr_ms) =
        run_blocking_stages(path, format, config).await?;
    info!(
        "Extracted {} chars, {} images ({} skipped) in {}ms",
        extraction.text.chars().count(),
        extraction.images.len(),
        extraction.skipped.len(),
        extract_ms
    );
    info!(
        "OCR recognised {}/{} images in {}ms",
        recognition.recognized,
        extraction.images.len(),
        ocr_ms
    );

    // ── Step 4: Combine native text with OCR text ────────────────────────
    let combined = combine_text(&extraction.text, &recognition.text);

    // ── Step 5: Ask the model ────────────────────────────────────────────
    let provider = resolve_provider(config)?;
    let prompt = config.system_prompt.as_deref().unwrap_or_default();
    let messages = llm::build_messages(prompt, &combined);

    let llm_start = Instant::now();
    let response = provider.chat(&messages).await?;
    let llm_ms = llm_start.elapsed().as_millis() as u64;
    info!(
        "Model '{}' replied with {} chars in {}ms via {}",
        config.model,
        response.chars().count(),
        llm_ms,
        provider.name()
    );

    // ── Step 6: Assemble output ──────────────────────────────────────────
    let mut skipped = extraction.skipped.clone();
    skipped.extend(recognition.skipped.iter().cloned());
    for skip in &skipped {
        warn!("Skipped during analysis: {skip}");
    }

    let stats = AnalysisStats {
        pages: extraction.pages,
        native_text_chars: extraction.text.chars().count(),
        images_found: extraction.images.len(),
        images_recognized: recognition.recognized,
        items_skipped: skipped.len(),
        response_chars: response.chars().count(),
        extract_duration_ms: extract_ms,
        ocr_duration_ms: ocr_ms,
        llm_duration_ms: llm_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    Ok(AnalysisOutput {
        response,
        skipped,
        stats,
    })
}

/// Analyse a document and write the reply into a DOCX report.
///
/// The report is written only after the chat call has succeeded; a fatal
/// error at any earlier stage leaves no partial file behind.
pub async fn analyze_to_file(
    input: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, AnalyzeError> {
    let output = analyze(input, config).await?;

    let path = output_path.as_ref().to_path_buf();
    let content = output.response.clone();
    let title = config.report_title.clone();
    tokio::task::spawn_blocking(move || report::write_report(&content, &path, &title))
        .await
        .map_err(|e| AnalyzeError::Internal(format!("report task panicked: {e}")))??;

    Ok(output)
}

/// Synchronous wrapper around [`analyze`].
///
/// Creates a temporary tokio runtime internally.
pub fn analyze_sync(
    input: impl AsRef<str>,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, AnalyzeError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| AnalyzeError::Internal(format!("failed to create tokio runtime: {e}")))?
        .block_on(analyze(input, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Run extraction and OCR, returning both results and their durations.
///
/// With an injected engine (tests, custom backends) both stages run
/// inline; otherwise the whole sequence moves to a blocking task where the
/// tesseract engine is constructed first as the stage's capability check.
async fn run_blocking_stages(
    path: PathBuf,
    format: DocumentFormat,
    config: &AnalysisConfig,
) -> Result<(Extraction, Recognition, u64, u64), AnalyzeError> {
    if let Some(engine) = config.ocr_engine.clone() {
        let extract_start = Instant::now();
        let extraction = extract::extract(&path, format)?;
        let extract_ms = extract_start.elapsed().as_millis() as u64;

        let ocr_start = Instant::now();
        let mut guard = engine
            .lock()
            .map_err(|_| AnalyzeError::Internal("OCR engine mutex poisoned".into()))?;
        let recognition = recognize::recognize_images(&mut *guard, &extraction.images);
        drop(guard);
        let ocr_ms = ocr_start.elapsed().as_millis() as u64;

        return Ok((extraction, recognition, extract_ms, ocr_ms));
    }

    let languages = config.ocr_languages.clone();
    tokio::task::spawn_blocking(
        move || -> Result<(Extraction, Recognition, u64, u64), AnalyzeError> {
            let mut engine = TesseractEngine::new(&languages)?;

            let extract_start = Instant::now();
            let extraction = extract::extract(&path, format)?;
            let extract_ms = extract_start.elapsed().as_millis() as u64;

            let ocr_start = Instant::now();
            let recognition = recognize::recognize_images(&mut engine, &extraction.images);
            let ocr_ms = ocr_start.elapsed().as_millis() as u64;

            Ok((extraction, recognition, extract_ms, ocr_ms))
        },
    )
    .await
    .map_err(|e| AnalyzeError::Internal(format!("analysis task panicked: {e}")))?
}

/// Resolve the chat provider: an injected one wins, otherwise OpenAI from
/// the environment. The API-key check happens here, at the point the
/// Responder is needed — never earlier.
fn resolve_provider(config: &AnalysisConfig) -> Result<Arc<dyn ChatProvider>, AnalyzeError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }
    Ok(Arc::new(OpenAiChat::from_env(
        config.model.clone(),
        config.temperature,
        config.api_timeout_secs,
    )?))
}

/// Append OCR text to the native text.
///
/// OCR text joins after a single newline only when it has non-whitespace
/// content; otherwise the native text is returned unchanged, with no
/// trailing separator.
fn combine_text(native: &str, ocr: &str) -> String {
    if ocr.trim().is_empty() {
        native.to_string()
    } else {
        format!("{native}\n{ocr}")
    }
}
