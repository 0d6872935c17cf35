//! sheetscan - turn photographed or scanned documents into spreadsheets.
//!
//! An OCR engine supplies words with positions and confidences; this crate
//! rebuilds the page's rows, columns and key/value pairs from those
//! positions alone and writes the result as an .xlsx workbook.

pub mod api;
pub mod error;
pub mod layout;
pub mod ocr;
pub mod preprocess;
pub mod sheet;

pub use api::{ConversionReport, Pipeline};
pub use error::{ErrorKind, Result, ScanError};
pub use layout::{Grid, ReconstructParams, ReconstructedRow, Role, Token, reconstruct};
