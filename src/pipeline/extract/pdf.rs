//! PDF extraction: per-page text plus embedded image streams, via `lopdf`.
//!
//! ## Why lopdf and not a rasteriser?
//!
//! The pipeline needs the document's *native* text and its *embedded*
//! images as separate artefacts — the text goes straight to the model, the
//! images go through OCR first. Rendering pages to bitmaps would merge the
//! two and force OCR over text that is already machine-readable. `lopdf`
//! exposes both the text content streams and the image XObjects directly.
//!
//! ## Failure policy
//!
//! Text extraction is attempted per page; a page that fails contributes an
//! empty string so page count and page order stay intact. Image XObjects
//! are resolved one by one; any single failure is recorded and skipped.

use super::Extraction;
use crate::error::{AnalyzeError, ItemSkip};
use lopdf::{Dictionary, Document, Object, Stream};
use std::path::Path;
use tracing::{debug, warn};

/// Extract text and embedded images from a PDF file.
///
/// Text is the newline-join of per-page texts in page order. Images are
/// collected page by page, in each page's XObject declaration order.
pub fn extract_pdf(path: &Path) -> Result<Extraction, AnalyzeError> {
    let doc = Document::load(path).map_err(|e| AnalyzeError::PdfParse {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let pages = doc.get_pages();
    debug!("PDF loaded: {} pages", pages.len());

    let mut texts: Vec<String> = Vec::with_capacity(pages.len());
    let mut images: Vec<Vec<u8>> = Vec::new();
    let mut skipped: Vec<ItemSkip> = Vec::new();

    for (&page_num, &page_id) in &pages {
        match doc.extract_text(&[page_num]) {
            Ok(text) => texts.push(text.trim_end().to_string()),
            Err(e) => {
                warn!("Page {}: text extraction failed: {}", page_num, e);
                skipped.push(ItemSkip::PageText {
                    page: page_num,
                    detail: e.to_string(),
                });
                texts.push(String::new());
            }
        }

        collect_page_images(&doc, page_id, page_num, &mut images, &mut skipped);
    }

    Ok(Extraction {
        text: texts.join("\n"),
        pages: pages.len(),
        images,
        skipped,
    })
}

/// Append every image XObject of one page to `images`.
fn collect_page_images(
    doc: &Document,
    page_id: (u32, u16),
    page_num: u32,
    images: &mut Vec<Vec<u8>>,
    skipped: &mut Vec<ItemSkip>,
) {
    let Ok(page_dict) = doc.get_dictionary(page_id) else {
        return;
    };
    let Some(resources) = page_resources(doc, page_dict) else {
        return;
    };
    let Some(xobjects) = resources.get(b"XObject").ok().and_then(|o| as_dict(doc, o)) else {
        return;
    };

    for (name, object) in xobjects.iter() {
        let name = String::from_utf8_lossy(name).into_owned();
        match image_bytes(doc, object) {
            Ok(Some(bytes)) => images.push(bytes),
            Ok(None) => {} // not an image XObject (form, pattern, …)
            Err(detail) => {
                warn!("Page {}, image '{}': {}", page_num, name, detail);
                skipped.push(ItemSkip::PdfImage {
                    page: page_num,
                    name,
                    detail,
                });
            }
        }
    }
}

/// Resolve the page's `Resources` dictionary, walking `Parent` links for
/// inherited resources.
fn page_resources<'a>(doc: &'a Document, page_dict: &'a Dictionary) -> Option<&'a Dictionary> {
    let mut current = page_dict;
    // Page trees are shallow in practice; the bound only guards against
    // cyclic Parent references in malformed files.
    for _ in 0..8 {
        if let Some(resources) = current.get(b"Resources").ok().and_then(|o| as_dict(doc, o)) {
            return Some(resources);
        }
        current = current
            .get(b"Parent")
            .ok()
            .and_then(|o| as_dict(doc, o))?;
    }
    None
}

/// Resolve a direct dictionary or a reference to one.
fn as_dict<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Dictionary> {
    match object {
        Object::Dictionary(dict) => Some(dict),
        Object::Reference(id) => doc.get_object(*id).ok()?.as_dict().ok(),
        _ => None,
    }
}

/// Extract the raw bytes of an image XObject.
///
/// Returns `Ok(None)` when the XObject is not an image, `Err` when it is an
/// image whose bytes cannot be read. DCT/JPX-compressed streams keep their
/// raw content (which *is* the image file); filter chains lopdf understands
/// are decompressed first.
fn image_bytes(doc: &Document, object: &Object) -> Result<Option<Vec<u8>>, String> {
    let stream: &Stream = match object {
        Object::Stream(stream) => stream,
        Object::Reference(id) => doc
            .get_object(*id)
            .map_err(|e| e.to_string())?
            .as_stream()
            .map_err(|e| e.to_string())?,
        _ => return Ok(None),
    };

    let is_image = stream
        .dict
        .get(b"Subtype")
        .ok()
        .and_then(|o| o.as_name().ok())
        .is_some_and(|n| n == b"Image");
    if !is_image {
        return Ok(None);
    }

    let bytes = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());
    if bytes.is_empty() {
        return Err("image stream is empty".to_string());
    }
    Ok(Some(bytes))
}
