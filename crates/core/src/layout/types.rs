//! Token and grid types.

use std::fmt;

use itertools::Itertools;
use serde::Serialize;

/// A recognized word as reported by an OCR engine, before filtering.
///
/// The confidence is kept exactly as the engine printed it; it is parsed by
/// the token filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawToken {
    pub text: String,
    pub left: i32,
    pub top: i32,
    pub confidence: String,
}

impl RawToken {
    pub fn new(text: impl Into<String>, left: i32, top: i32, confidence: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            left,
            top,
            confidence: confidence.into(),
        }
    }
}

/// One OCR-recognized word or fragment with its position and confidence.
///
/// `confidence` is 0..=100, or -1 when the engine gave no usable value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    pub text: String,
    pub left: i32,
    pub top: i32,
    pub confidence: i32,
}

impl Token {
    pub fn new(text: impl Into<String>, left: i32, top: i32, confidence: i32) -> Self {
        Self {
            text: text.into(),
            left,
            top,
            confidence,
        }
    }
}

/// One or more horizontally adjacent tokens of a line merged into a cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnCell {
    pub text: String,
    /// Left edge of the leftmost contributing token.
    pub left: i32,
}

/// How a reconstructed line was interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    MultiColumn,
    KeyValue,
    Heading,
    Plain,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::MultiColumn => "multi_column",
            Role::KeyValue => "key_value",
            Role::Heading => "heading",
            Role::Plain => "plain",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Style intent of an emitted cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellStyle {
    #[default]
    Plain,
    /// Bold and highlighted: key cells and headings.
    Emphasized,
}

/// A cell as handed to the spreadsheet writer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub text: String,
    pub style: CellStyle,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: CellStyle::Plain,
        }
    }

    pub fn emphasized(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: CellStyle::Emphasized,
        }
    }

    pub fn is_emphasized(&self) -> bool {
        self.style == CellStyle::Emphasized
    }
}

/// A classified line of the page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReconstructedRow {
    pub role: Role,
    pub cells: Vec<Cell>,
}

impl ReconstructedRow {
    /// Texts of the row's cells, left to right.
    pub fn texts(&self) -> Vec<&str> {
        self.cells.iter().map(|c| c.text.as_str()).collect()
    }
}

/// The reconstructed page: rows in top-to-bottom order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Grid {
    pub rows: Vec<ReconstructedRow>,
}

impl Grid {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReconstructedRow> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = &'a ReconstructedRow;
    type IntoIter = std::slice::Iter<'a, ReconstructedRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Plain text rendering, one line per row. Emphasized cells are wrapped in
/// asterisks.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            let cells = row
                .cells
                .iter()
                .map(|c| {
                    if c.is_emphasized() {
                        format!("*{}*", c.text)
                    } else {
                        c.text.clone()
                    }
                })
                .join(" | ");
            writeln!(f, "{}: {}", row.role, cells)?;
        }
        Ok(())
    }
}
