//! In-process Tesseract via leptess.

use image::GrayImage;
use leptess::{LepTess, Variable};
use tracing::debug;

use super::{DEFAULT_LANGUAGE, DEFAULT_PSM, Recognition, TokenSource, encode_png};
use crate::error::{Result, ScanError};
use crate::layout::RawToken;

/// Tesseract linked into the process.
///
/// Words are taken from word-level component boxes; each word's confidence
/// is the engine's mean confidence inside that box.
#[derive(Clone, Debug)]
pub struct LepTessSource {
    pub language: String,
    pub psm: u32,
}

impl Default for LepTessSource {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            psm: DEFAULT_PSM,
        }
    }
}

impl LepTessSource {
    /// Check that the engine initializes with `language` before use.
    pub fn new(language: impl Into<String>, psm: u32) -> Result<Self> {
        let language = language.into();
        LepTess::new(None, &language).map_err(|e| {
            ScanError::Recognition(format!(
                "failed to initialize Tesseract with language '{language}': {e}"
            ))
        })?;
        Ok(Self { language, psm })
    }
}

impl TokenSource for LepTessSource {
    fn recognize(&self, image: &GrayImage) -> Result<Recognition> {
        let mut lt = LepTess::new(None, &self.language)
            .map_err(|e| ScanError::Recognition(format!("failed to initialize Tesseract: {e}")))?;
        lt.set_variable(Variable::TesseditPagesegMode, &self.psm.to_string())
            .map_err(|e| ScanError::Recognition(format!("failed to set PSM: {e}")))?;

        let png = encode_png(image)?;
        lt.set_image_from_mem(&png)
            .map_err(|e| ScanError::Recognition(format!("failed to set image: {e}")))?;

        let transcript = lt.get_utf8_text().unwrap_or_default();

        // No boxes means a blank page, not a failure.
        let Some(boxes) = lt.get_component_boxes(leptess::capi::TessPageIteratorLevel_RIL_WORD, true)
        else {
            return Ok(Recognition {
                tokens: Vec::new(),
                transcript,
            });
        };

        let mut tokens = Vec::new();
        for bbox in &boxes {
            let geom = bbox.get_geometry();
            lt.set_rectangle(geom.x, geom.y, geom.w, geom.h);
            let text = lt.get_utf8_text().unwrap_or_default();
            let confidence = lt.mean_text_conf();
            tokens.push(RawToken {
                text: text.trim().to_string(),
                left: geom.x,
                top: geom.y,
                confidence: confidence.to_string(),
            });
        }
        debug!(words = tokens.len(), "leptess recognized words");

        Ok(Recognition { tokens, transcript })
    }
}
