//! Tesseract TSV output parsing.
//!
//! Tesseract's `tsv` renderer prints one row per page, block, paragraph,
//! line and word:
//!
//! ```text
//! level  page_num  block_num  par_num  line_num  word_num  left  top  width  height  conf  text
//! ```
//!
//! Non-word rows carry confidence `-1` and no text, so the token filter drops
//! them.

use std::path::Path;

use image::GrayImage;
use itertools::Itertools;
use tracing::debug;

use super::{Recognition, TokenSource};
use crate::error::{Result, ScanError};
use crate::layout::RawToken;

/// Column positions resolved from the header row.
struct Columns {
    left: usize,
    top: usize,
    conf: usize,
    text: usize,
    page: Option<usize>,
    block: Option<usize>,
    par: Option<usize>,
    line: Option<usize>,
}

impl Columns {
    fn from_header(header: &str) -> Result<Self> {
        let names: Vec<&str> = header.split('\t').map(str::trim).collect();
        let find = |name: &str| names.iter().position(|n| *n == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| {
                ScanError::Recognition(format!("TSV header is missing the `{name}` column"))
            })
        };

        Ok(Self {
            left: require("left")?,
            top: require("top")?,
            conf: require("conf")?,
            text: require("text")?,
            page: find("page_num"),
            block: find("block_num"),
            par: find("par_num"),
            line: find("line_num"),
        })
    }

    /// Highest index a row must reach to be usable. The text column may be
    /// cut off when the text is empty.
    fn min_fields(&self) -> usize {
        self.left.max(self.top).max(self.conf) + 1
    }
}

/// A word row, with the position it occupies in the page structure.
struct Row {
    token: RawToken,
    line_id: (i64, i64, i64, i64),
}

fn parse_row(cols: &Columns, fields: &[&str]) -> Option<Row> {
    if fields.len() < cols.min_fields() {
        return None;
    }
    let left = fields[cols.left].trim().parse::<i32>().ok()?;
    let top = fields[cols.top].trim().parse::<i32>().ok()?;
    let id = |idx: Option<usize>| {
        idx.and_then(|i| fields.get(i))
            .and_then(|f| f.trim().parse::<i64>().ok())
            .unwrap_or(0)
    };

    Some(Row {
        token: RawToken {
            text: fields.get(cols.text).copied().unwrap_or("").to_string(),
            left,
            top,
            confidence: fields[cols.conf].to_string(),
        },
        line_id: (id(cols.page), id(cols.block), id(cols.par), id(cols.line)),
    })
}

/// Rebuild a readable transcript: words joined per line, lines per
/// paragraph, and a blank line between blocks.
fn transcript(rows: &[Row]) -> String {
    let mut out = String::new();
    let mut prev: Option<(i64, i64, i64, i64)> = None;
    for (line_id, words) in &rows
        .iter()
        .filter(|r| !r.token.text.trim().is_empty())
        .chunk_by(|r| r.line_id)
    {
        if let Some(p) = prev {
            out.push('\n');
            if (p.0, p.1) != (line_id.0, line_id.1) {
                out.push('\n');
            }
        }
        out.push_str(&words.map(|r| r.token.text.trim()).join(" "));
        prev = Some(line_id);
    }
    out
}

/// Parse Tesseract TSV output into tokens and a transcript.
///
/// The header row is required and columns are located by name. Rows that
/// are too short or whose position is not an integer are skipped; a
/// malformed confidence is kept as-is for the filter to reject.
pub fn parse_tsv(input: &str) -> Result<Recognition> {
    let mut lines = input
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty());

    let Some(header) = lines.next() else {
        return Ok(Recognition::default());
    };
    let cols = Columns::from_header(header)?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for line in lines {
        let fields: Vec<&str> = line.split('\t').collect();
        match parse_row(&cols, &fields) {
            Some(row) => rows.push(row),
            None => {
                skipped += 1;
                debug!(row = line, "skipping unusable TSV row");
            }
        }
    }
    if skipped > 0 {
        debug!(skipped, kept = rows.len(), "TSV rows skipped");
    }

    let transcript = transcript(&rows);
    Ok(Recognition {
        tokens: rows.into_iter().map(|r| r.token).collect(),
        transcript,
    })
}

/// Replays previously captured Tesseract TSV instead of running an engine.
#[derive(Clone, Debug)]
pub struct TsvTokenSource {
    tsv: String,
}

impl TsvTokenSource {
    pub fn new(tsv: impl Into<String>) -> Self {
        Self { tsv: tsv.into() }
    }

    /// Read the TSV from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(std::fs::read_to_string(path)?))
    }
}

impl TokenSource for TsvTokenSource {
    fn recognize(&self, _image: &GrayImage) -> Result<Recognition> {
        parse_tsv(&self.tsv)
    }
}
