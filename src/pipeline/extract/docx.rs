//! DOCX extraction: paragraph text via `docx-rs`, embedded images via the
//! package's relationship table.
//!
//! ## Why two passes over the same file?
//!
//! `docx-rs` gives clean access to the document body (paragraphs, runs) but
//! not to the binary media parts. Images live in the OOXML package as ZIP
//! entries referenced from `word/_rels/document.xml.rels`, so the image
//! pass reads the file as a plain ZIP archive and follows every
//! relationship whose type is an image. Relationship-table order is kept
//! as the image order — it is deterministic, though not necessarily the
//! order images appear in the body.

use super::Extraction;
use crate::error::{AnalyzeError, ItemSkip};
use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Relationship part naming the document's attachments (images, styles, …).
const DOCUMENT_RELS: &str = "word/_rels/document.xml.rels";

/// Extract paragraph text and embedded images from a DOCX file.
pub fn extract_docx(path: &Path) -> Result<Extraction, AnalyzeError> {
    let bytes = std::fs::read(path).map_err(|e| AnalyzeError::DocxParse {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let docx = docx_rs::read_docx(&bytes).map_err(|e| AnalyzeError::DocxParse {
        path: path.to_path_buf(),
        detail: format!("{e:?}"),
    })?;

    let mut texts: Vec<String> = Vec::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            texts.push(paragraph_text(paragraph));
        }
    }
    debug!("DOCX loaded: {} paragraphs", texts.len());

    let mut skipped = Vec::new();
    let images = collect_images(&bytes, &mut skipped);

    Ok(Extraction {
        text: texts.join("\n"),
        images,
        skipped,
        pages: 0,
    })
}

/// The text of one paragraph: its run texts concatenated.
fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let RunChild::Text(t) = run_child {
                    text.push_str(&t.text);
                }
            }
        }
    }
    text
}

/// Read every image relationship target out of the ZIP package.
///
/// A package without a relationship part simply has no images. Individual
/// relationships that cannot be resolved (external targets, missing
/// entries) are recorded and skipped.
fn collect_images(bytes: &[u8], skipped: &mut Vec<ItemSkip>) -> Vec<Vec<u8>> {
    let cursor = std::io::Cursor::new(bytes);
    let Ok(mut archive) = zip::ZipArchive::new(cursor) else {
        return Vec::new();
    };

    let rels_xml = {
        let Ok(mut rels) = archive.by_name(DOCUMENT_RELS) else {
            return Vec::new();
        };
        let mut xml = String::new();
        if rels.read_to_string(&mut xml).is_err() {
            return Vec::new();
        }
        xml
    };

    let mut images = Vec::new();
    for rel in parse_relationships(&rels_xml) {
        if !rel.rel_type.ends_with("/image") {
            continue;
        }
        // Targets are relative to word/ unless package-absolute.
        let entry = match rel.target.strip_prefix('/') {
            Some(absolute) => absolute.to_string(),
            None => format!("word/{}", rel.target),
        };
        match archive.by_name(&entry) {
            Ok(mut file) => {
                let mut data = Vec::new();
                match file.read_to_end(&mut data) {
                    Ok(_) => images.push(data),
                    Err(e) => {
                        warn!("Relationship '{}': read failed: {}", rel.id, e);
                        skipped.push(ItemSkip::DocxImage {
                            id: rel.id,
                            detail: e.to_string(),
                        });
                    }
                }
            }
            Err(e) => {
                warn!("Relationship '{}': target '{}' not found: {}", rel.id, entry, e);
                skipped.push(ItemSkip::DocxImage {
                    id: rel.id,
                    detail: format!("target '{entry}': {e}"),
                });
            }
        }
    }
    images
}

struct Relationship {
    id: String,
    rel_type: String,
    target: String,
}

/// Parse `<Relationship Id=".." Type=".." Target=".."/>` entries in
/// document order.
fn parse_relationships(xml: &str) -> Vec<Relationship> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut relationships = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let mut id = String::new();
                let mut rel_type = String::new();
                let mut target = String::new();
                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(attr.value.as_ref()).into_owned();
                    match attr.key.as_ref() {
                        b"Id" => id = value,
                        b"Type" => rel_type = value,
                        b"Target" => target = value,
                        _ => {}
                    }
                }
                relationships.push(Relationship {
                    id,
                    rel_type,
                    target,
                });
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
    }
    relationships
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE_REL: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    const STYLES_REL: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

    #[test]
    fn relationships_parse_in_document_order() {
        let xml = format!(
            r#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="{STYLES_REL}" Target="styles.xml"/>
  <Relationship Id="rId2" Type="{IMAGE_REL}" Target="media/image1.png"/>
  <Relationship Id="rId3" Type="{IMAGE_REL}" Target="media/image2.png"/>
</Relationships>"#
        );
        let rels = parse_relationships(&xml);
        assert_eq!(rels.len(), 3);
        assert_eq!(rels[1].id, "rId2");
        assert_eq!(rels[1].target, "media/image1.png");
        assert!(rels[1].rel_type.ends_with("/image"));
        assert!(!rels[0].rel_type.ends_with("/image"));
    }

    #[test]
    fn paragraph_text_concatenates_runs() {
        use docx_rs::{Paragraph, Run};
        let paragraph = Paragraph::new()
            .add_run(Run::new().add_text("Hello "))
            .add_run(Run::new().add_text("world"));
        assert_eq!(paragraph_text(&paragraph), "Hello world");
    }

    #[test]
    fn paragraphs_join_with_newlines_and_keep_empties() {
        use docx_rs::{Docx, Paragraph, Run};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.docx");
        let file = std::fs::File::create(&path).unwrap();
        Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("first")))
            .add_paragraph(Paragraph::new())
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("third")))
            .build()
            .pack(file)
            .unwrap();

        let extraction = extract_docx(&path).unwrap();
        assert_eq!(extraction.text, "first\n\nthird");
        assert_eq!(extraction.pages, 0);
    }

    #[test]
    fn package_without_rels_part_has_no_images() {
        let mut skipped = Vec::new();
        // An empty (invalid) ZIP yields no images and no skips.
        let images = collect_images(b"PK\x05\x06 not a real archive", &mut skipped);
        assert!(images.is_empty());
        assert!(skipped.is_empty());
    }

    #[test]
    fn not_a_docx_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.docx");
        std::fs::write(&path, b"zip? what zip?").unwrap();

        let err = extract_docx(&path).unwrap_err();
        assert!(matches!(err, AnalyzeError::DocxParse { .. }));
    }
}
