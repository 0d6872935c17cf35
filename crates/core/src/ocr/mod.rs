//! OCR boundary.
//!
//! The recognition engine is an external collaborator. It is reached through
//! the [`TokenSource`] trait, which turns a preprocessed page image into
//! word-level tokens with their raw confidence values and a plain transcript
//! used only for diagnostics.

mod command;
#[cfg(feature = "tesseract")]
mod native;
mod tsv;

pub use command::TesseractCommand;
#[cfg(feature = "tesseract")]
pub use native::LepTessSource;
pub use tsv::{TsvTokenSource, parse_tsv};

use image::GrayImage;

use crate::error::Result;
use crate::layout::RawToken;

/// Default Tesseract language set.
pub const DEFAULT_LANGUAGE: &str = "kor+eng";
/// Default page segmentation mode: a single uniform block of text.
pub const DEFAULT_PSM: u32 = 6;
/// Default OCR engine mode: whatever the installed engine supports.
pub const DEFAULT_OEM: u32 = 3;

/// Output of one recognition run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Recognition {
    /// One entry per detected token, in engine order.
    pub tokens: Vec<RawToken>,
    /// Full-text transcript, for logging only.
    pub transcript: String,
}

/// Something that recognizes text on a page image.
pub trait TokenSource {
    /// Recognize the words of `image`.
    ///
    /// Failures are reported as [`crate::error::ScanError::Recognition`] and
    /// are not retried.
    fn recognize(&self, image: &GrayImage) -> Result<Recognition>;
}

impl<T: TokenSource + ?Sized> TokenSource for &T {
    fn recognize(&self, image: &GrayImage) -> Result<Recognition> {
        (**self).recognize(image)
    }
}

impl<T: TokenSource + ?Sized> TokenSource for Box<T> {
    fn recognize(&self, image: &GrayImage) -> Result<Recognition> {
        (**self).recognize(image)
    }
}

/// Encode a page image as PNG, the format engines take from memory or stdin.
pub(crate) fn encode_png(image: &GrayImage) -> Result<Vec<u8>> {
    let mut buf = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut buf, image::ImageFormat::Png)
        .map_err(|e| {
            crate::error::ScanError::Recognition(format!("failed to encode image to PNG: {e}"))
        })?;
    Ok(buf.into_inner())
}
