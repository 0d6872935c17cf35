//! Minimal SpreadsheetML (.xlsx) writer.
//!
//! Writes a single worksheet with inline strings. The worksheet part is
//! streamed row by row; the static parts (workbook, relationships, styles)
//! are added when the writer is finished.

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{RowSink, column_widths, emit_grid};
use crate::error::{Result, ScanError};
use crate::layout::{Cell, CellStyle, Grid, ReconstructedRow, Role};

/// Title of the only worksheet.
pub const SHEET_TITLE: &str = "Table OCR";

const SHEET_PATH: &str = "xl/worksheets/sheet1.xml";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

// Fonts: 0 default, 1 Arial 11, 2 Arial 11 bold.
// Fills: 0 none, 1 gray125 (reserved), 2 key F2F2F2, 3 heading D9D9D9.
// Cell formats: 0 default, 1 plain, 2 key, 3 heading.
const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="3"><font><sz val="11"/><name val="Calibri"/><family val="2"/></font><font><sz val="11"/><name val="Arial"/><family val="2"/></font><font><b/><sz val="11"/><name val="Arial"/><family val="2"/></font></fonts><fills count="4"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill><fill><patternFill patternType="solid"><fgColor rgb="FFF2F2F2"/><bgColor rgb="FFF2F2F2"/></patternFill></fill><fill><patternFill patternType="solid"><fgColor rgb="FFD9D9D9"/><bgColor rgb="FFD9D9D9"/></patternFill></fill></fills><borders count="2"><border><left/><right/><top/><bottom/><diagonal/></border><border><left style="thin"><color auto="1"/></left><right style="thin"><color auto="1"/></right><top style="thin"><color auto="1"/></top><bottom style="thin"><color auto="1"/></bottom><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="4"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="0" borderId="1" xfId="0" applyFont="1" applyBorder="1" applyAlignment="1"><alignment horizontal="left" vertical="top" wrapText="1"/></xf><xf numFmtId="0" fontId="2" fillId="2" borderId="1" xfId="0" applyFont="1" applyFill="1" applyBorder="1" applyAlignment="1"><alignment horizontal="left" vertical="top" wrapText="1"/></xf><xf numFmtId="0" fontId="2" fillId="3" borderId="1" xfId="0" applyFont="1" applyFill="1" applyBorder="1" applyAlignment="1"><alignment horizontal="left" vertical="top" wrapText="1"/></xf></cellXfs><cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles></styleSheet>"#;

/// Index into `cellXfs` for a cell of a row with `role`.
///
/// Emphasized key cells get the light key fill; any other emphasized cell
/// is a heading.
pub(crate) fn style_index(role: Role, cell: &Cell) -> u32 {
    match (cell.style, role) {
        (CellStyle::Plain, _) => 1,
        (CellStyle::Emphasized, Role::KeyValue) => 2,
        (CellStyle::Emphasized, _) => 3,
    }
}

/// Spreadsheet column letters for a 1-based index: 1 is `A`, 27 is `AA`.
pub fn column_name(mut index: u32) -> String {
    let mut name = Vec::new();
    while index > 0 {
        let rem = (index - 1) % 26;
        name.push(b'A' + rem as u8);
        index = (index - 1) / 26;
    }
    name.reverse();
    String::from_utf8(name).unwrap_or_default()
}

/// Escape cell text for XML, dropping characters XML 1.0 cannot carry.
fn xml_text(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|&c| matches!(c, '\t' | '\n' | '\r') || c >= ' ')
        .collect();
    html_escape::encode_text(&cleaned).into_owned()
}

fn options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

/// Streams rows into an .xlsx package.
pub struct XlsxWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    last_row: u32,
}

impl<W: Write + Seek> XlsxWriter<W> {
    /// Start a workbook; the worksheet header and column widths are written
    /// immediately.
    pub fn new(inner: W) -> Result<Self> {
        let mut zip = ZipWriter::new(inner);
        zip.start_file(SHEET_PATH, options())?;

        let mut head = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
             <worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\"><cols>",
        );
        for (col, width) in column_widths() {
            head.push_str(&format!(
                "<col min=\"{col}\" max=\"{col}\" width=\"{width}\" customWidth=\"1\"/>"
            ));
        }
        head.push_str("</cols><sheetData>");
        zip.write_all(head.as_bytes())?;

        Ok(Self { zip, last_row: 0 })
    }

    /// Close the worksheet, add the remaining parts and return the inner
    /// writer.
    pub fn finish(mut self) -> Result<W> {
        self.zip.write_all(b"</sheetData></worksheet>")?;

        let workbook = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
             <workbook xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" \
             xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\">\
             <sheets><sheet name=\"{}\" sheetId=\"1\" r:id=\"rId1\"/></sheets></workbook>",
            html_escape::encode_double_quoted_attribute(SHEET_TITLE)
        );
        let parts: [(&str, &str); 5] = [
            ("[Content_Types].xml", CONTENT_TYPES),
            ("_rels/.rels", ROOT_RELS),
            ("xl/workbook.xml", &workbook),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
            ("xl/styles.xml", STYLES),
        ];
        for (name, body) in parts {
            self.zip.start_file(name, options())?;
            self.zip.write_all(body.as_bytes())?;
        }

        Ok(self.zip.finish()?)
    }
}

impl<W: Write + Seek> RowSink for XlsxWriter<W> {
    fn write_row(&mut self, row_index: u32, row: &ReconstructedRow) -> Result<()> {
        if row_index <= self.last_row {
            return Err(ScanError::Processing(format!(
                "rows must be written in ascending order: row {row_index} after row {}",
                self.last_row
            )));
        }
        self.last_row = row_index;

        let mut xml = format!("<row r=\"{row_index}\">");
        for (col, cell) in (1u32..).zip(&row.cells) {
            xml.push_str(&format!(
                "<c r=\"{}{row_index}\" s=\"{}\" t=\"inlineStr\"><is><t xml:space=\"preserve\">{}</t></is></c>",
                column_name(col),
                style_index(row.role, cell),
                xml_text(&cell.text)
            ));
        }
        xml.push_str("</row>");
        self.zip.write_all(xml.as_bytes())?;
        Ok(())
    }
}

/// Write `grid` as a workbook into `inner`.
pub fn write_xlsx<W: Write + Seek>(grid: &Grid, inner: W) -> Result<W> {
    let mut writer = XlsxWriter::new(inner)?;
    emit_grid(grid, &mut writer)?;
    writer.finish()
}

/// Save `grid` as a workbook at `path`, returning the number of rows written.
pub fn save_xlsx(grid: &Grid, path: impl AsRef<Path>) -> Result<u32> {
    let path = path.as_ref();
    let mut writer = XlsxWriter::new(BufWriter::new(File::create(path)?))?;
    let rows = emit_grid(grid, &mut writer)?;
    writer.finish()?.flush()?;
    info!(path = %path.display(), rows, "saved workbook");
    Ok(rows)
}
