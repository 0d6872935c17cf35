//! img2sheet - Convert photographed or scanned documents into spreadsheets
//!
//! Runs OCR on each input image, rebuilds its rows, columns and key/value
//! pairs from token positions, and writes one workbook per image.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, ValueEnum};
use sheetscan_core::ocr::{
    DEFAULT_LANGUAGE, DEFAULT_OEM, DEFAULT_PSM, TesseractCommand, TokenSource, TsvTokenSource,
};
use sheetscan_core::preprocess::Preprocessor;
use sheetscan_core::{Grid, Pipeline, ReconstructParams};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// Output type for the reconstructed page.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
enum OutputType {
    /// Excel workbook (default)
    #[default]
    Xlsx,
    /// JSON dump of the grid
    Json,
    /// Plain text rendering printed to stdout
    Text,
}

impl OutputType {
    fn extension(self) -> Option<&'static str> {
        match self {
            OutputType::Xlsx => Some("xlsx"),
            OutputType::Json => Some("json"),
            OutputType::Text => None,
        }
    }
}

/// Convert document images into spreadsheets using OCR and layout
/// reconstruction.
#[derive(Parser, Debug)]
#[command(name = "img2sheet")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// One or more image files (PNG, JPEG, TIFF, BMP, WebP)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    // === Output options ===
    /// Directory to write outputs to (default: next to each input)
    #[arg(short = 'o', long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Type of output to generate
    #[arg(short = 't', long = "output-type", value_enum, default_value = "xlsx")]
    output_type: OutputType,

    // === Layout options ===
    /// Height in pixels of the vertical band that forms one row
    #[arg(long = "line-bucket", default_value_t = sheetscan_core::layout::params::DEFAULT_LINE_BUCKET)]
    line_bucket: u32,

    /// Horizontal gap in pixels above which a new column starts
    #[arg(long = "column-gap", default_value_t = sheetscan_core::layout::params::DEFAULT_COLUMN_GAP, allow_negative_numbers = true)]
    column_gap: i32,

    /// Tokens at or below this confidence are dropped
    #[arg(long = "min-confidence", default_value_t = sheetscan_core::layout::params::DEFAULT_MIN_CONFIDENCE, allow_negative_numbers = true)]
    min_confidence: i32,

    // === OCR options ===
    /// Tesseract language set
    #[arg(short = 'l', long = "lang", default_value = DEFAULT_LANGUAGE)]
    lang: String,

    /// Tesseract page segmentation mode
    #[arg(long, default_value_t = DEFAULT_PSM)]
    psm: u32,

    /// Tesseract OCR engine mode
    #[arg(long, default_value_t = DEFAULT_OEM)]
    oem: u32,

    /// Path to the tesseract executable
    #[arg(long = "tesseract", default_value = "tesseract")]
    tesseract: PathBuf,

    /// Run Tesseract in-process instead of spawning the executable
    #[cfg(feature = "tesseract")]
    #[arg(long = "in-process", action = ArgAction::SetTrue)]
    in_process: bool,

    /// Replay a captured Tesseract TSV instead of running OCR (one input only)
    #[arg(long = "tokens")]
    tokens: Option<PathBuf>,

    /// Skip contrast, denoise and binarization; only convert to grayscale
    #[arg(long = "no-preprocess", action = ArgAction::SetTrue)]
    no_preprocess: bool,
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn build_source(args: &Args) -> Result<Box<dyn TokenSource>> {
    if let Some(tsv) = &args.tokens {
        let source = TsvTokenSource::from_path(tsv)
            .with_context(|| format!("failed to read tokens from {}", tsv.display()))?;
        return Ok(Box::new(source));
    }

    if let Some(source) = in_process_source(args)? {
        return Ok(source);
    }

    Ok(Box::new(
        TesseractCommand::new(args.lang.clone())
            .program(&args.tesseract)
            .psm(args.psm)
            .oem(args.oem),
    ))
}

#[cfg(feature = "tesseract")]
fn in_process_source(args: &Args) -> Result<Option<Box<dyn TokenSource>>> {
    if !args.in_process {
        return Ok(None);
    }
    let source = sheetscan_core::ocr::LepTessSource::new(args.lang.clone(), args.psm)
        .context("failed to start in-process Tesseract")?;
    Ok(Some(Box::new(source)))
}

#[cfg(not(feature = "tesseract"))]
fn in_process_source(_args: &Args) -> Result<Option<Box<dyn TokenSource>>> {
    Ok(None)
}

fn build_pipeline(args: &Args) -> Result<Pipeline<Box<dyn TokenSource>>> {
    let params = ReconstructParams::new(args.line_bucket, args.column_gap, args.min_confidence)
        .context("invalid layout parameters")?;
    let preprocessor = if args.no_preprocess {
        None
    } else {
        Some(Preprocessor::default())
    };
    Ok(Pipeline::new(build_source(args)?)
        .params(params)
        .preprocessor(preprocessor))
}

/// Where the output for `input` goes: `<dir>/<stem>.<ext>`.
fn output_path(input: &Path, output_dir: Option<&Path>, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    dir.join(format!("{stem}.{extension}"))
}

fn write_json(grid: &Grid, path: &Path) -> Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, grid)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

fn process_file(
    pipeline: &Pipeline<Box<dyn TokenSource>>,
    input: &Path,
    args: &Args,
    out: &mut impl Write,
) -> Result<()> {
    debug!(input = %input.display(), "converting");
    let Some(extension) = args.output_type.extension() else {
        let grid = pipeline.grid_from_path(input)?;
        writeln!(out, "== {} ==", input.display())?;
        write!(out, "{grid}")?;
        return Ok(());
    };

    let target = output_path(input, args.output_dir.as_deref(), extension);
    let rows_created = match args.output_type {
        OutputType::Json => {
            let grid = pipeline.grid_from_path(input)?;
            write_json(&grid, &target)?;
            grid.len()
        }
        _ => pipeline.convert_file(input, &target)?.rows_created as usize,
    };
    writeln!(
        out,
        "{} -> {} ({rows_created} rows)",
        input.display(),
        target.display()
    )?;
    Ok(())
}

fn run(args: &Args) -> Result<bool> {
    if args.tokens.is_some() && args.files.len() != 1 {
        bail!("--tokens replays a single page; pass exactly one input file");
    }
    if let Some(dir) = &args.output_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    }

    let pipeline = build_pipeline(args)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut all_ok = true;
    for path in &args.files {
        if let Err(e) = process_file(&pipeline, path, args, &mut out) {
            error!(input = %path.display(), "conversion failed");
            eprintln!("Error processing {}: {:#}", path.display(), e);
            all_ok = false;
        }
    }
    out.flush()?;
    Ok(all_ok)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}
