//! High-level API module for image-to-spreadsheet conversion.
//!
//! # Example
//!
//! ```ignore
//! use sheetscan_core::api::Pipeline;
//! use sheetscan_core::ocr::TesseractCommand;
//!
//! let grid = Pipeline::new(TesseractCommand::default()).grid_from_path("scan.png")?;
//! print!("{grid}");
//! ```

pub mod pipeline;

pub use pipeline::{ConversionReport, Pipeline};
