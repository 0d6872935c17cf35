//! Page image decoding and cleanup before recognition.
//!
//! The default pipeline is grayscale, contrast boost, median denoise and
//! Otsu binarization. It only has to help the engine read the page; token
//! semantics never depend on it, so any step can be turned off.

use std::path::Path;

use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::{ThresholdType, otsu_level, threshold};
use imageproc::filter::median_filter;
use tracing::debug;

use crate::error::{Result, ScanError};

/// Decode an encoded raster image (PNG, JPEG, TIFF, ...).
///
/// Undecodable or empty images are invalid input.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    if bytes.is_empty() {
        return Err(ScanError::InvalidInput("image file is empty".to_string()));
    }
    let image = image::load_from_memory(bytes)?;
    if image.width() == 0 || image.height() == 0 {
        return Err(ScanError::InvalidInput(format!(
            "image has no pixels ({}x{})",
            image.width(),
            image.height()
        )));
    }
    Ok(image)
}

/// Read and decode an image file.
///
/// A missing or unreadable file is invalid input, like an undecodable one.
pub fn load_image(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        ScanError::InvalidInput(format!("failed to read {}: {e}", path.display()))
    })?;
    decode_image(&bytes)
}

/// Image cleanup steps applied before recognition.
#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessor {
    /// Multiply every gray level by this factor, saturating at white.
    pub contrast: Option<f32>,
    /// Median filter radius in pixels.
    pub denoise_radius: Option<u32>,
    /// Binarize with Otsu's threshold.
    pub binarize: bool,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self {
            contrast: Some(1.5),
            denoise_radius: Some(1),
            binarize: true,
        }
    }
}

impl Preprocessor {
    /// Grayscale conversion only.
    pub fn grayscale_only() -> Self {
        Self {
            contrast: None,
            denoise_radius: None,
            binarize: false,
        }
    }

    /// Run the enabled steps.
    pub fn apply(&self, image: &DynamicImage) -> GrayImage {
        let mut gray = image.to_luma8();
        if let Some(alpha) = self.contrast {
            gray = scale_contrast(&gray, alpha);
        }
        if let Some(radius) = self.denoise_radius {
            gray = median_filter(&gray, radius, radius);
        }
        if self.binarize {
            let level = otsu_level(&gray);
            debug!(level, "otsu threshold");
            gray = binarize(&gray, level);
        }
        gray
    }
}

/// `saturate(round(p * alpha))` for every pixel.
pub fn scale_contrast(gray: &GrayImage, alpha: f32) -> GrayImage {
    let mut out = gray.clone();
    for p in out.pixels_mut() {
        let v = (f32::from(p.0[0]) * alpha).round().clamp(0.0, 255.0);
        *p = Luma([v as u8]);
    }
    out
}

/// Pixels above `level` become white, the rest black.
pub fn binarize(gray: &GrayImage, level: u8) -> GrayImage {
    threshold(gray, level, ThresholdType::Binary)
}
