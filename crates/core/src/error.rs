//! Error types for the sheetscan pipeline.

use thiserror::Error;

/// Primary error type for image-to-spreadsheet conversion.
///
/// Low-confidence or unparsable tokens and empty pages are not errors: they
/// are absorbed by the token filter and produce an empty grid.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("image decode error: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("recognition failed: {0}")]
    Recognition(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("processing failed: {0}")]
    Processing(String),
}

/// Caller-facing classification of a [`ScanError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input could not be used; reported to the user, never retried.
    InvalidInput,
    /// The OCR engine failed; surfaced verbatim.
    Recognition,
    /// Anything else that went wrong while producing the spreadsheet.
    Processing,
}

impl ScanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScanError::InvalidInput(_) | ScanError::ImageDecode(_) => ErrorKind::InvalidInput,
            ScanError::Recognition(_) => ErrorKind::Recognition,
            ScanError::Io(_) | ScanError::Archive(_) | ScanError::Processing(_) => {
                ErrorKind::Processing
            }
        }
    }
}

/// Convenience Result type alias for ScanError.
pub type Result<T> = std::result::Result<T, ScanError>;
