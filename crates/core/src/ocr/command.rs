//! Tesseract through its command line executable.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use image::GrayImage;
use tracing::debug;

use super::{
    DEFAULT_LANGUAGE, DEFAULT_OEM, DEFAULT_PSM, Recognition, TokenSource, encode_png, parse_tsv,
};
use crate::error::{Result, ScanError};

/// Runs the `tesseract` binary, feeding the page as PNG on stdin and reading
/// TSV from stdout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TesseractCommand {
    /// Executable to run; looked up on `PATH` when not absolute.
    pub program: PathBuf,
    /// Language codes, e.g. `"kor+eng"`.
    pub language: String,
    /// Page segmentation mode (`--psm`).
    pub psm: u32,
    /// OCR engine mode (`--oem`).
    pub oem: u32,
}

impl Default for TesseractCommand {
    fn default() -> Self {
        Self {
            program: PathBuf::from("tesseract"),
            language: DEFAULT_LANGUAGE.to_string(),
            psm: DEFAULT_PSM,
            oem: DEFAULT_OEM,
        }
    }
}

impl TesseractCommand {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            ..Self::default()
        }
    }

    pub fn program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn psm(mut self, psm: u32) -> Self {
        self.psm = psm;
        self
    }

    pub fn oem(mut self, oem: u32) -> Self {
        self.oem = oem;
        self
    }

    /// Arguments passed to the executable, in order.
    pub fn args(&self) -> Vec<String> {
        vec![
            "stdin".to_string(),
            "stdout".to_string(),
            "-l".to_string(),
            self.language.clone(),
            "--psm".to_string(),
            self.psm.to_string(),
            "--oem".to_string(),
            self.oem.to_string(),
            "tsv".to_string(),
        ]
    }
}

impl TokenSource for TesseractCommand {
    fn recognize(&self, image: &GrayImage) -> Result<Recognition> {
        let png = encode_png(image)?;
        debug!(program = %self.program.display(), args = ?self.args(), "running tesseract");

        let mut child = Command::new(&self.program)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ScanError::Recognition(format!(
                    "failed to run {}: {e}",
                    self.program.display()
                ))
            })?;

        let stdin = child.stdin.take();
        let feeder = std::thread::spawn(move || -> std::io::Result<()> {
            if let Some(mut stdin) = stdin {
                stdin.write_all(&png)?;
            }
            Ok(())
        });

        let output = child.wait_with_output().map_err(|e| {
            ScanError::Recognition(format!("failed to wait for tesseract: {e}"))
        })?;
        let fed = feeder
            .join()
            .map_err(|_| ScanError::Recognition("stdin writer panicked".to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScanError::Recognition(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        fed.map_err(|e| ScanError::Recognition(format!("failed to send image: {e}")))?;

        parse_tsv(&String::from_utf8_lossy(&output.stdout))
    }
}
