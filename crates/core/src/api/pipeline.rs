//! End-to-end conversion: image → tokens → grid → workbook.
//!
//! # Example
//! ```ignore
//! use sheetscan_core::api::Pipeline;
//! use sheetscan_core::ocr::TesseractCommand;
//!
//! let report = Pipeline::new(TesseractCommand::default())
//!     .column_gap(120)
//!     .convert_file("receipt.jpg", "receipt.xlsx")?;
//! println!("{} rows", report.rows_created);
//! ```

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};

use image::DynamicImage;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::error::{Result, ScanError};
use crate::layout::{Grid, ReconstructParams, reconstruct_raw};
use crate::ocr::{Recognition, TokenSource};
use crate::preprocess::{Preprocessor, load_image};
use crate::sheet::save_xlsx;

/// Outcome of converting one image file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows_created: u32,
}

/// Converts page images into grids and workbooks.
///
/// Holds no per-document state; one pipeline can convert any number of
/// documents.
#[derive(Debug, Clone)]
pub struct Pipeline<S> {
    source: S,
    params: ReconstructParams,
    preprocessor: Option<Preprocessor>,
}

impl<S: TokenSource> Pipeline<S> {
    /// A pipeline with default parameters and preprocessing.
    pub fn new(source: S) -> Self {
        Self {
            source,
            params: ReconstructParams::default(),
            preprocessor: Some(Preprocessor::default()),
        }
    }

    /// Replace all reconstruction parameters.
    pub fn params(mut self, params: ReconstructParams) -> Self {
        self.params = params;
        self
    }

    /// Sets the vertical band height used to group tokens into lines.
    pub fn line_bucket(mut self, pixels: u32) -> Self {
        self.params.line_bucket = pixels;
        self
    }

    /// Sets the horizontal gap above which a new column starts.
    pub fn column_gap(mut self, pixels: i32) -> Self {
        self.params.column_gap = pixels;
        self
    }

    /// Sets the confidence a token must exceed.
    pub fn min_confidence(mut self, confidence: i32) -> Self {
        self.params.min_confidence = confidence;
        self
    }

    /// Use `preprocessor`, or only grayscale conversion when `None`.
    pub fn preprocessor(mut self, preprocessor: Option<Preprocessor>) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    pub fn reconstruct_params(&self) -> &ReconstructParams {
        &self.params
    }

    /// Preprocess `image` and run the token source on it.
    pub fn recognize(&self, image: &DynamicImage) -> Result<Recognition> {
        let page = match &self.preprocessor {
            Some(p) => p.apply(image),
            None => Preprocessor::grayscale_only().apply(image),
        };
        let recognition = self.source.recognize(&page)?;
        debug!(
            tokens = recognition.tokens.len(),
            "=== FULL TEXT ===\n{}\n================",
            recognition.transcript
        );
        Ok(recognition)
    }

    /// Recognize and reconstruct one decoded page.
    pub fn grid_from_image(&self, image: &DynamicImage) -> Result<Grid> {
        let recognition = self.recognize(image)?;
        let params = self.params;
        let grid = catch_unwind(AssertUnwindSafe(|| {
            reconstruct_raw(recognition.tokens, &params)
        }))
        .map_err(|panic| {
            let msg = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            ScanError::Processing(format!("layout reconstruction panicked: {msg}"))
        })?;
        debug!(rows = grid.len(), "reconstructed grid");
        Ok(grid)
    }

    /// Decode, recognize and reconstruct an encoded image.
    pub fn grid_from_bytes(&self, bytes: &[u8]) -> Result<Grid> {
        let image = crate::preprocess::decode_image(bytes)?;
        self.grid_from_image(&image)
    }

    /// Read an image file and reconstruct its grid.
    pub fn grid_from_path(&self, input: impl AsRef<Path>) -> Result<Grid> {
        let image = load_image(input)?;
        self.grid_from_image(&image)
    }

    /// Convert an image file into a workbook at `output`.
    ///
    /// Failures are logged here with the input path and their kind before
    /// being returned.
    pub fn convert_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<ConversionReport> {
        let input = input.as_ref();
        let output = output.as_ref();
        debug!(input = %input.display(), "processing file");

        let result = self
            .grid_from_path(input)
            .and_then(|grid| save_xlsx(&grid, output));

        match result {
            Ok(rows_created) => {
                info!(
                    input = %input.display(),
                    output = %output.display(),
                    rows_created,
                    "file processed"
                );
                Ok(ConversionReport {
                    input: input.to_path_buf(),
                    output: output.to_path_buf(),
                    rows_created,
                })
            }
            Err(e) => {
                error!(input = %input.display(), kind = ?e.kind(), error = %e, "error processing file");
                Err(e)
            }
        }
    }
}
