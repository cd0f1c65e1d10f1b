//! Report generation: write the model's reply into a formatted DOCX.
//!
//! One heading paragraph carries the title, then one body paragraph per
//! line of the reply. Splitting on line boundaries (rather than dumping the
//! whole reply into a single paragraph) preserves the visual structure the
//! model produced — blank lines become empty paragraphs and keep sections
//! apart.

use crate::error::AnalyzeError;
use docx_rs::{Docx, Paragraph, Run, Style, StyleType};
use std::path::Path;
use tracing::info;

/// Style id of the report heading.
const HEADING_STYLE: &str = "Heading1";

/// Write `content` to a new DOCX at `output_path`, under a heading.
///
/// Intermediate directories are created as needed; an existing file at the
/// path is overwritten.
pub fn write_report(content: &str, output_path: &Path, title: &str) -> Result<(), AnalyzeError> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| AnalyzeError::ReportWrite {
                path: output_path.to_path_buf(),
                detail: e.to_string(),
            })?;
        }
    }

    let mut docx = Docx::new()
        .add_style(
            Style::new(HEADING_STYLE, StyleType::Paragraph)
                .name("Heading 1")
                .size(32)
                .bold(),
        )
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(title))
                .style(HEADING_STYLE),
        );

    for line in content.lines() {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
    }

    let file = std::fs::File::create(output_path).map_err(|e| AnalyzeError::ReportWrite {
        path: output_path.to_path_buf(),
        detail: e.to_string(),
    })?;

    docx.build()
        .pack(file)
        .map_err(|e| AnalyzeError::ReportWrite {
            path: output_path.to_path_buf(),
            detail: e.to_string(),
        })?;

    info!("Report written to {}", output_path.display());
    Ok(())
}
