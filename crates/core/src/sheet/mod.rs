//! Grid emission and spreadsheet output.
//!
//! The grid emitter does no reconstruction. It walks the grid in order and
//! hands each row to a [`RowSink`] with its 1-based row index; cells keep
//! their left-to-right order as 1-based column indexes.

mod xlsx;

pub use xlsx::{SHEET_TITLE, XlsxWriter, column_name, save_xlsx, write_xlsx};

use tracing::debug;

use crate::error::Result;
use crate::layout::{Grid, ReconstructedRow};

/// Width of column A.
pub const FIRST_COLUMN_WIDTH: f64 = 35.0;
/// Width of column B.
pub const SECOND_COLUMN_WIDTH: f64 = 50.0;
/// Width of every other formatted column.
pub const DEFAULT_COLUMN_WIDTH: f64 = 25.0;
/// Number of leading columns that get a fixed width.
pub const FORMATTED_COLUMNS: u32 = 9;

/// Static column widths, `(1-based column, width)`. Not derived from content.
pub fn column_widths() -> Vec<(u32, f64)> {
    (1..=FORMATTED_COLUMNS)
        .map(|col| {
            let width = match col {
                1 => FIRST_COLUMN_WIDTH,
                2 => SECOND_COLUMN_WIDTH,
                _ => DEFAULT_COLUMN_WIDTH,
            };
            (col, width)
        })
        .collect()
}

/// Receives reconstructed rows one at a time, in grid order.
pub trait RowSink {
    /// Write `row` at 1-based `row_index`.
    fn write_row(&mut self, row_index: u32, row: &ReconstructedRow) -> Result<()>;
}

impl<S: RowSink + ?Sized> RowSink for &mut S {
    fn write_row(&mut self, row_index: u32, row: &ReconstructedRow) -> Result<()> {
        (**self).write_row(row_index, row)
    }
}

/// Feed every row of `grid` to `sink`, starting at row 1.
///
/// Returns the number of rows written.
pub fn emit_grid<S: RowSink + ?Sized>(grid: &Grid, sink: &mut S) -> Result<u32> {
    let mut written = 0u32;
    for (row_index, row) in (1u32..).zip(grid.iter()) {
        sink.write_row(row_index, row)?;
        written = row_index;
    }
    debug!(rows = written, "emitted grid");
    Ok(written)
}
