//! Layout reconstruction: from OCR tokens to a grid of rows and cells.
//!
//! This module contains:
//! - Token and grid types (Token, ColumnCell, ReconstructedRow, Grid)
//! - Reconstruction parameters (ReconstructParams)
//! - The token filter, line grouper, column segmenter and row classifier
//!
//! Every stage is a pure function over freshly built values, so a page can be
//! reconstructed from any thread without shared state.

pub mod classify;
pub mod columns;
pub mod filter;
pub mod lines;
pub mod params;
pub mod types;

use itertools::Itertools;
use tracing::debug;

pub use classify::classify_row;
pub use columns::{estimated_width, order_left_to_right, segment_columns};
pub use filter::{filter_raw_tokens, filter_tokens, parse_confidence};
pub use lines::{LineGroups, group_lines, line_key};
pub use params::ReconstructParams;
pub use types::{Cell, CellStyle, ColumnCell, Grid, RawToken, ReconstructedRow, Role, Token};

/// Build the grid for tokens that already passed the filter.
///
/// Row order is ascending line key, so the result does not depend on the
/// order tokens arrive in.
pub fn reconstruct_filtered(tokens: Vec<Token>, params: &ReconstructParams) -> Grid {
    let groups = group_lines(tokens, params.line_bucket);
    debug!(lines = groups.len(), "grouped tokens into lines");

    let rows = groups
        .into_values()
        .map(|words| {
            let cells = segment_columns(&words, params.column_gap);
            let line_text = order_left_to_right(&words)
                .into_iter()
                .map(|t| t.text.as_str())
                .join(" ");
            classify_row(cells, &line_text)
        })
        .collect();

    Grid { rows }
}

/// Filter, group, segment and classify parsed tokens.
pub fn reconstruct(tokens: Vec<Token>, params: &ReconstructParams) -> Grid {
    let total = tokens.len();
    let kept = filter_tokens(tokens, params.min_confidence);
    debug!(total, kept = kept.len(), "filtered tokens");
    reconstruct_filtered(kept, params)
}

/// Same as [`reconstruct`], for engine output whose confidences are still
/// unparsed.
pub fn reconstruct_raw(tokens: Vec<RawToken>, params: &ReconstructParams) -> Grid {
    let total = tokens.len();
    let kept = filter_raw_tokens(tokens, params.min_confidence);
    debug!(total, kept = kept.len(), "filtered tokens");
    reconstruct_filtered(kept, params)
}
