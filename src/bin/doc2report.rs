//! CLI binary for doc2report.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `AnalysisConfig` and prints a run summary.

use anyhow::{Context, Result};
use clap::Parser;
use doc2report::{analyze_to_file, load_prompt, AnalysisConfig};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Analyse a PDF expertise and write the findings report
  doc2report --input expertise.pdf --output findings.docx

  # DOCX input, custom instruction prompt
  doc2report --input report.docx --output findings.docx --prompt instructions.txt

  # English-only OCR, a different model, some sampling noise
  doc2report --input scan.pdf --output out.docx --ocr-lang eng --model gpt-4o --temperature 0.3

PROMPT RESOLUTION:
  --prompt PATH        use that file's content as the system prompt
  (no --prompt)        probe ./prompt.txt; if absent, run with an empty prompt

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY       API key for the completion endpoint (required)
  OPENAI_BASE_URL      Endpoint override (default: https://api.openai.com/v1)
  DOC2REPORT_MODEL     Default for --model
  DOC2REPORT_OCR_LANG  Default for --ocr-lang

SETUP:
  1. Install tesseract plus the language data you need (e.g. rus, eng).
  2. Set the API key:   export OPENAI_API_KEY=sk-...
  3. Analyse:           doc2report --input report.pdf --output findings.docx
"#;

/// Analyze expert-report documents (PDF/DOCX) with OCR and an LLM.
#[derive(Parser, Debug)]
#[command(
    name = "doc2report",
    version,
    about = "Analyze expert-report documents (PDF/DOCX) with OCR and an LLM",
    long_about = "Extract text and embedded images from an expert-report document (PDF or DOCX), \
OCR the images, send the combined text to a chat-completion endpoint with an instruction \
prompt, and write the reply into a formatted DOCX report.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Source document (PDF or DOCX).
    #[arg(long)]
    input: String,

    /// Destination DOCX report.
    #[arg(long)]
    output: PathBuf,

    /// Path to a text file with the instruction prompt.
    #[arg(long)]
    prompt: Option<PathBuf>,

    /// Chat model identifier.
    #[arg(long, env = "DOC2REPORT_MODEL", default_value = "gpt-4")]
    model: String,

    /// Sampling temperature (0.0–2.0; 0 = deterministic).
    #[arg(long, env = "DOC2REPORT_TEMPERATURE", default_value_t = 0.0)]
    temperature: f32,

    /// Tesseract language spec, e.g. 'rus', 'eng' or 'rus+eng'.
    #[arg(long = "ocr-lang", env = "DOC2REPORT_OCR_LANG", default_value = "rus+eng")]
    ocr_lang: String,

    /// Heading of the generated report.
    #[arg(long, env = "DOC2REPORT_TITLE", default_value = "Findings Summary")]
    title: String,

    /// Chat-completion request timeout in seconds.
    #[arg(long, env = "DOC2REPORT_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOC2REPORT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOC2REPORT_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Prompt resolution ────────────────────────────────────────────────
    let prompt = load_prompt(cli.prompt.as_deref()).context("Failed to load prompt")?;

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = AnalysisConfig::builder()
        .model(&cli.model)
        .temperature(cli.temperature)
        .ocr_languages(&cli.ocr_lang)
        .report_title(&cli.title)
        .api_timeout_secs(cli.api_timeout);
    if !prompt.is_empty() {
        builder = builder.system_prompt(prompt);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run analysis ─────────────────────────────────────────────────────
    let output = analyze_to_file(&cli.input, &cli.output, &config)
        .await
        .context("Analysis failed")?;

    if !cli.quiet {
        eprintln!(
            "{}  {} chars native, {}/{} images OCRed, reply {} chars  {}ms  →  {}",
            if output.stats.items_skipped == 0 {
                green("✔")
            } else {
                yellow("⚠")
            },
            output.stats.native_text_chars,
            output.stats.images_recognized,
            output.stats.images_found,
            output.stats.response_chars,
            output.stats.total_duration_ms,
            bold(&cli.output.display().to_string()),
        );
        if output.stats.items_skipped > 0 {
            eprintln!(
                "   {} — rerun with --verbose for details",
                dim(&format!("{} item(s) skipped", output.stats.items_skipped)),
            );
        }
    }

    Ok(())
}
