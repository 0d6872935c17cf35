//! Layout reconstruction parameters.
//!
//! Contains ReconstructParams, the only tuning surface of the reconstruction
//! pipeline.

use crate::error::{Result, ScanError};

/// Default vertical bucket width in pixels.
pub const DEFAULT_LINE_BUCKET: u32 = 15;
/// Default horizontal gap in pixels above which a new column starts.
pub const DEFAULT_COLUMN_GAP: i32 = 100;
/// Default confidence a token must exceed to survive filtering.
pub const DEFAULT_MIN_CONFIDENCE: i32 = 30;

/// Parameters for layout reconstruction.
///
/// Controls how tokens are filtered, grouped into lines and split into
/// columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconstructParams {
    /// Height of the vertical band, in pixels, whose tokens are considered to
    /// be on the same line. A token's line key is `round(top / line_bucket)`.
    /// Large fonts or skewed scans need a larger value.
    pub line_bucket: u32,

    /// If the gap between the estimated right edge of the previous token and
    /// the left edge of the next one is larger than this, the next token
    /// starts a new column cell.
    pub column_gap: i32,

    /// Tokens whose confidence is not strictly greater than this are dropped.
    pub min_confidence: i32,
}

impl Default for ReconstructParams {
    fn default() -> Self {
        Self {
            line_bucket: DEFAULT_LINE_BUCKET,
            column_gap: DEFAULT_COLUMN_GAP,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

impl ReconstructParams {
    /// Creates new reconstruction parameters with the specified values.
    ///
    /// Rejects a zero line bucket and a negative column gap.
    pub fn new(line_bucket: u32, column_gap: i32, min_confidence: i32) -> Result<Self> {
        if line_bucket == 0 {
            return Err(ScanError::InvalidInput(
                "line bucket must be at least 1 pixel".to_string(),
            ));
        }
        if column_gap < 0 {
            return Err(ScanError::InvalidInput(format!(
                "column gap must not be negative, got {column_gap}"
            )));
        }

        Ok(Self {
            line_bucket,
            column_gap,
            min_confidence,
        })
    }
}
