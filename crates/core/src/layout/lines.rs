//! Line grouping by quantized vertical position.
//!
//! This is a banding approximation that tolerates OCR vertical jitter inside
//! one band, not a geometric line fit.

use std::collections::BTreeMap;

use super::types::Token;

/// Line key to tokens, iterated in ascending key order (top to bottom).
///
/// Tokens inside a bucket keep first-seen order; the column segmenter sorts
/// them horizontally.
pub type LineGroups = BTreeMap<i64, Vec<Token>>;

/// Quantize a top coordinate into a line key: `round(top / line_bucket)`,
/// ties to even.
pub fn line_key(top: i32, line_bucket: u32) -> i64 {
    let bucket = f64::from(line_bucket.max(1));
    (f64::from(top) / bucket).round_ties_even() as i64
}

/// Bucket tokens into lines.
pub fn group_lines<I>(tokens: I, line_bucket: u32) -> LineGroups
where
    I: IntoIterator<Item = Token>,
{
    let mut groups = LineGroups::new();
    for token in tokens {
        groups
            .entry(line_key(token.top, line_bucket))
            .or_default()
            .push(token);
    }
    groups
}
