//! Configuration types for document analysis.
//!
//! All analysis behaviour is controlled through [`AnalysisConfig`], built
//! via its [`AnalysisConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across calls, log them, and diff two runs to
//! understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A many-field constructor is unreadable and breaks on every new field.
//! The builder pattern lets callers set only what they care about and rely on
//! well-documented defaults for the rest.

use crate::error::AnalyzeError;
use crate::pipeline::llm::ChatProvider;
use crate::pipeline::recognize::OcrEngine;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Configuration for one document analysis run.
///
/// Built via [`AnalysisConfig::builder()`] or using
/// [`AnalysisConfig::default()`].
///
/// # Example
/// ```rust
/// use doc2report::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .model("gpt-4")
///     .temperature(0.0)
///     .ocr_languages("rus+eng")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct AnalysisConfig {
    /// Chat model identifier sent to the completion endpoint. Default: "gpt-4".
    pub model: String,

    /// Sampling temperature for the completion. Default: 0.0.
    ///
    /// Zero makes the model effectively deterministic, which is what you want
    /// when the output is an audit-style findings report that should be
    /// reproducible across runs. Values up to 2.0 are accepted.
    pub temperature: f32,

    /// Tesseract language spec for OCR over embedded images. Default: "rus+eng".
    ///
    /// Either a single code ("rus", "eng", "deu") or several joined with `+`.
    /// The string is handed to the engine verbatim; a language whose trained
    /// data is not installed fails at engine construction, before any
    /// document work starts.
    pub ocr_languages: String,

    /// Instruction prompt sent as the system message. If None, the system
    /// message is empty.
    pub system_prompt: Option<String>,

    /// Heading text of the generated report. Default: "Findings Summary".
    pub report_title: String,

    /// Chat-completion request timeout in seconds. Default: 120.
    ///
    /// Long expert reports produce long completions; 120 s leaves headroom
    /// for slow models without hanging forever on a dead connection. This is
    /// a client-level bound, not a retry mechanism — on expiry the request
    /// fails and the error propagates.
    pub api_timeout_secs: u64,

    /// Pre-constructed chat provider. Takes precedence over the
    /// environment-based OpenAI provider. Useful in tests or when the caller
    /// needs a custom endpoint wrapper.
    pub provider: Option<Arc<dyn ChatProvider>>,

    /// Pre-constructed OCR engine. When set, the tesseract engine is neither
    /// probed nor constructed. Useful in tests.
    pub ocr_engine: Option<Arc<Mutex<dyn OcrEngine + Send>>>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            temperature: 0.0,
            ocr_languages: "rus+eng".to_string(),
            system_prompt: None,
            report_title: "Findings Summary".to_string(),
            api_timeout_secs: 120,
            provider: None,
            ocr_engine: None,
        }
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("ocr_languages", &self.ocr_languages)
            .field(
                "system_prompt",
                &self.system_prompt.as_ref().map(|p| p.len()),
            )
            .field("report_title", &self.report_title)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn ChatProvider>"))
            .field("ocr_engine", &self.ocr_engine.as_ref().map(|_| "<dyn OcrEngine>"))
            .finish()
    }
}

impl AnalysisConfig {
    /// Create a new builder for `AnalysisConfig`.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`AnalysisConfig`].
#[derive(Debug)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn ocr_languages(mut self, langs: impl Into<String>) -> Self {
        self.config.ocr_languages = langs.into();
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn report_title(mut self, title: impl Into<String>) -> Self {
        self.config.report_title = title.into();
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn provider(mut self, provider: Arc<dyn ChatProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn ocr_engine(mut self, engine: Arc<Mutex<dyn OcrEngine + Send>>) -> Self {
        self.config.ocr_engine = Some(engine);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalysisConfig, AnalyzeError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(AnalyzeError::InvalidConfig(
                "model id must not be empty".into(),
            ));
        }
        if c.ocr_languages.trim().is_empty() {
            return Err(AnalyzeError::InvalidConfig(
                "OCR language spec must not be empty".into(),
            ));
        }
        if !(0.0..=2.0).contains(&c.temperature) {
            return Err(AnalyzeError::InvalidConfig(format!(
                "temperature must be 0.0–2.0, got {}",
                c.temperature
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = AnalysisConfig::default();
        assert_eq!(c.model, "gpt-4");
        assert_eq!(c.temperature, 0.0);
        assert_eq!(c.ocr_languages, "rus+eng");
        assert!(c.system_prompt.is_none());
    }

    #[test]
    fn builder_clamps_temperature() {
        let c = AnalysisConfig::builder().temperature(5.0).build().unwrap();
        assert_eq!(c.temperature, 2.0);

        let c = AnalysisConfig::builder().temperature(-1.0).build().unwrap();
        assert_eq!(c.temperature, 0.0);
    }

    #[test]
    fn builder_rejects_empty_model() {
        let err = AnalysisConfig::builder().model("  ").build().unwrap_err();
        assert!(err.to_string().contains("model"));
    }

    #[test]
    fn builder_rejects_empty_languages() {
        let err = AnalysisConfig::builder()
            .ocr_languages("")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("language"));
    }
}
