//! OCR over extracted images: decode, normalise, recognise, join.
//!
//! ## The engine seam
//!
//! Recognition goes through the [`OcrEngine`] trait so the pipeline can be
//! exercised without a tesseract install (tests inject a fake engine) and
//! so the backend could be swapped without touching the batching and
//! error-collection logic here. [`TesseractEngine`] is the production
//! implementation.
//!
//! ## Why re-encode to PNG?
//!
//! Tesseract accepts only plain 8-bit grayscale or RGB input. Embedded
//! document images arrive in whatever mode they were authored in (palette,
//! RGBA, CMYK-JPEG, …), so each blob is decoded with `image`, converted to
//! RGB when needed, and handed to the engine as a lossless PNG. Lossless
//! matters: JPEG artefacts on glyph edges measurably hurt recognition.

use crate::error::{AnalyzeError, ItemSkip};
use image::DynamicImage;
use leptess::LepTess;
use std::io::Cursor;
use tracing::{debug, warn};

/// The outcome of recognising a batch of images.
#[derive(Debug, Clone, Default)]
pub struct Recognition {
    /// Non-empty recognised fragments, joined with newlines in input order.
    pub text: String,
    /// Images that failed to decode or recognise, in occurrence order.
    pub skipped: Vec<ItemSkip>,
    /// Count of images that produced non-empty text.
    pub recognized: usize,
}

/// A text-recognition backend fed one PNG at a time.
pub trait OcrEngine {
    /// Recognise the text in one PNG image.
    ///
    /// The error string carries the engine's own message; the caller
    /// records it as a skip and moves on.
    fn recognize(&mut self, png: &[u8]) -> Result<String, String>;
}

/// Tesseract-backed [`OcrEngine`] via `leptess`.
pub struct TesseractEngine {
    tess: LepTess,
}

impl TesseractEngine {
    /// Initialise tesseract for the given language spec (`"eng"`,
    /// `"rus+eng"`, …).
    ///
    /// This is the capability check for the whole OCR stage: a missing
    /// tesseract install or missing language data fails here, before any
    /// document work has been done.
    pub fn new(languages: &str) -> Result<Self, AnalyzeError> {
        let tess = LepTess::new(None, languages).map_err(|e| AnalyzeError::OcrUnavailable {
            languages: languages.to_string(),
            detail: e.to_string(),
        })?;
        debug!("OCR engine initialised for '{}'", languages);
        Ok(Self { tess })
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&mut self, png: &[u8]) -> Result<String, String> {
        self.tess
            .set_image_from_mem(png)
            .map_err(|e| e.to_string())?;
        self.tess.get_utf8_text().map_err(|e| e.to_string())
    }
}

/// Recognise text in every image, skipping failures.
///
/// Fragments are collected in input order; empty results are omitted; the
/// joined text is empty when nothing was recognised. No per-image failure
/// escapes this function.
pub fn recognize_images(engine: &mut dyn OcrEngine, images: &[Vec<u8>]) -> Recognition {
    let mut fragments: Vec<String> = Vec::new();
    let mut skipped: Vec<ItemSkip> = Vec::new();

    for (index, blob) in images.iter().enumerate() {
        let png = match prepare_image(blob) {
            Ok(png) => png,
            Err(detail) => {
                warn!("Image {}: decode failed: {}", index, detail);
                skipped.push(ItemSkip::ImageDecode { index, detail });
                continue;
            }
        };

        match engine.recognize(&png) {
            Ok(text) => {
                let text = text.trim_end().to_string();
                if !text.is_empty() {
                    fragments.push(text);
                }
            }
            Err(detail) => {
                warn!("Image {}: recognition failed: {}", index, detail);
                skipped.push(ItemSkip::Recognition { index, detail });
            }
        }
    }

    Recognition {
        recognized: fragments.len(),
        text: fragments.join("\n"),
        skipped,
    }
}

/// Decode a raw image blob and re-encode it as a PNG the engine accepts.
///
/// Plain 8-bit grayscale and RGB pass through unchanged; every other
/// colour mode is converted to RGB first.
fn prepare_image(blob: &[u8]) -> Result<Vec<u8>, String> {
    let decoded = image::load_from_memory(blob).map_err(|e| e.to_string())?;

    let normalised = match decoded {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => decoded,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    };

    let mut buf = Vec::new();
    normalised
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| e.to_string())?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    /// Fake engine mapping each call to the next canned response.
    struct ScriptedEngine {
        responses: Vec<Result<String, String>>,
        calls: usize,
    }

    impl ScriptedEngine {
        fn new(responses: Vec<Result<String, String>>) -> Self {
            Self {
                responses,
                calls: 0,
            }
        }
    }

    impl OcrEngine for ScriptedEngine {
        fn recognize(&mut self, _png: &[u8]) -> Result<String, String> {
            let response = self.responses[self.calls].clone();
            self.calls += 1;
            response
        }
    }

    fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            4,
            4,
            Rgba([255, 255, 255, 255]),
        ));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn empty_image_list_yields_empty_text() {
        let mut engine = ScriptedEngine::new(vec![]);
        let recognition = recognize_images(&mut engine, &[]);
        assert_eq!(recognition.text, "");
        assert!(recognition.skipped.is_empty());
        assert_eq!(engine.calls, 0);
    }

    #[test]
    fn undecodable_images_are_skipped_without_reaching_engine() {
        let mut engine = ScriptedEngine::new(vec![]);
        let images = vec![vec![0xDE, 0xAD], vec![0xBE, 0xEF]];
        let recognition = recognize_images(&mut engine, &images);

        assert_eq!(recognition.text, "");
        assert_eq!(recognition.skipped.len(), 2);
        assert!(matches!(
            recognition.skipped[0],
            ItemSkip::ImageDecode { index: 0, .. }
        ));
        assert_eq!(engine.calls, 0);
    }

    #[test]
    fn fragments_join_in_order_and_empties_are_omitted() {
        let mut engine = ScriptedEngine::new(vec![
            Ok("first\n".to_string()),
            Ok("   \n".to_string()),
            Ok("third".to_string()),
        ]);
        let images = vec![png_bytes(), png_bytes(), png_bytes()];
        let recognition = recognize_images(&mut engine, &images);

        assert_eq!(recognition.text, "first\nthird");
        assert_eq!(recognition.recognized, 2);
        assert!(recognition.skipped.is_empty());
    }

    #[test]
    fn engine_failure_is_recorded_and_loop_continues() {
        let mut engine = ScriptedEngine::new(vec![
            Err("boom".to_string()),
            Ok("survivor".to_string()),
        ]);
        let images = vec![png_bytes(), png_bytes()];
        let recognition = recognize_images(&mut engine, &images);

        assert_eq!(recognition.text, "survivor");
        assert_eq!(recognition.skipped.len(), 1);
        assert!(matches!(
            recognition.skipped[0],
            ItemSkip::Recognition { index: 0, .. }
        ));
    }

    #[test]
    fn prepare_image_converts_rgba_to_rgb() {
        let png = prepare_image(&png_bytes()).expect("prepare should succeed");
        let round_tripped = image::load_from_memory(&png).unwrap();
        assert!(matches!(round_tripped, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn prepare_image_keeps_grayscale() {
        let gray = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(4, 4, image::Luma([128])));
        let mut buf = Vec::new();
        gray.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();

        let png = prepare_image(&buf).expect("prepare should succeed");
        let round_tripped = image::load_from_memory(&png).unwrap();
        assert!(matches!(round_tripped, DynamicImage::ImageLuma8(_)));
    }
}
