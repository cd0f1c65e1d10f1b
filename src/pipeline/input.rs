//! Input validation and format detection.
//!
//! The input format is decided exactly once, here, from the file suffix.
//! Everything downstream matches on [`DocumentFormat`] instead of
//! re-inspecting the path, so an unsupported input fails at the boundary
//! before any extraction, OCR, or network work happens.

use crate::error::AnalyzeError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The two document formats the pipeline can extract from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Detect the format from the file suffix, case-insensitively.
    ///
    /// Anything other than `.pdf` or `.docx` is an error naming the suffix.
    pub fn from_path(path: &Path) -> Result<Self, AnalyzeError> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            _ => Err(AnalyzeError::UnsupportedFormat {
                extension: if extension.is_empty() {
                    "(none)".to_string()
                } else {
                    format!(".{extension}")
                },
            }),
        }
    }
}

/// Validate that the input exists and is readable, and detect its format.
pub fn resolve_input(path_str: &str) -> Result<(PathBuf, DocumentFormat), AnalyzeError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(AnalyzeError::FileNotFound { path });
    }

    // Check read permission by attempting to open
    match std::fs::File::open(&path) {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(AnalyzeError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(AnalyzeError::FileNotFound { path });
        }
    }

    let format = DocumentFormat::from_path(&path)?;
    debug!("Resolved input: {} ({:?})", path.display(), format);
    Ok((path, format))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_pdf_and_docx_case_insensitively() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("report.pdf")).unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("REPORT.PDF")).unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("report.DocX")).unwrap(),
            DocumentFormat::Docx
        );
    }

    #[test]
    fn rejects_other_suffixes_naming_them() {
        let err = DocumentFormat::from_path(Path::new("notes.txt")).unwrap_err();
        assert!(err.to_string().contains(".txt"));

        let err = DocumentFormat::from_path(Path::new("no_extension")).unwrap_err();
        assert!(matches!(err, AnalyzeError::UnsupportedFormat { .. }));
    }

    #[test]
    fn missing_file_is_reported_before_format() {
        // Existence is checked first so a typo'd path gets a file error,
        // not a format error.
        let err = resolve_input("/definitely/not/here.pdf").unwrap_err();
        assert!(matches!(err, AnalyzeError::FileNotFound { .. }));
    }

    #[test]
    fn unsupported_suffix_on_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.txt");
        std::fs::write(&path, "plain text").unwrap();

        let err = resolve_input(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, AnalyzeError::UnsupportedFormat { .. }));
    }
}
