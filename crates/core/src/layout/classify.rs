//! Row classification.
//!
//! Rules are tried in a fixed priority order and the first match wins:
//! multi-column, key/value, heading, plain. A line matching several rules
//! (a short line with a colon, say) always takes the earliest one.

use super::types::{Cell, ColumnCell, ReconstructedRow, Role};

/// Single-cluster lines shorter than this many characters are headings.
pub const HEADING_MAX_CHARS: usize = 30;

/// The decision taken for one line, before cells are built.
#[derive(Debug, PartialEq, Eq)]
enum Decision<'a> {
    MultiColumn,
    KeyValue { key: &'a str, value: &'a str },
    Heading,
    Plain,
}

fn decide<'a>(cells: &[ColumnCell], line_text: &'a str) -> Decision<'a> {
    if cells.len() > 1 {
        return Decision::MultiColumn;
    }
    if !line_text.starts_with(':') {
        if let Some((key, value)) = line_text.split_once(':') {
            return Decision::KeyValue {
                key: key.trim(),
                value: value.trim(),
            };
        }
    }
    if is_upper(line_text) || line_text.chars().count() < HEADING_MAX_CHARS {
        return Decision::Heading;
    }
    Decision::Plain
}

/// Upper-case in the sense of "has cased letters, none of them lower-case".
fn is_upper(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

/// Classify a line and build its output cells.
///
/// `line_text` is every token of the line joined by a single space, left to
/// right.
pub fn classify_row(cells: Vec<ColumnCell>, line_text: &str) -> ReconstructedRow {
    match decide(&cells, line_text) {
        Decision::MultiColumn => ReconstructedRow {
            role: Role::MultiColumn,
            cells: cells.into_iter().map(|c| Cell::plain(c.text)).collect(),
        },
        Decision::KeyValue { key, value } => ReconstructedRow {
            role: Role::KeyValue,
            cells: vec![Cell::emphasized(key), Cell::plain(value)],
        },
        Decision::Heading => ReconstructedRow {
            role: Role::Heading,
            cells: vec![Cell::emphasized(line_text)],
        },
        Decision::Plain => ReconstructedRow {
            role: Role::Plain,
            cells: vec![Cell::plain(line_text)],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::CellStyle;

    fn single(text: &str) -> Vec<ColumnCell> {
        vec![ColumnCell {
            text: text.to_string(),
            left: 0,
        }]
    }

    #[test]
    fn several_cells_are_multi_column_even_with_colon() {
        let cells = vec![
            ColumnCell {
                text: "Date:".into(),
                left: 0,
            },
            ColumnCell {
                text: "2024-01-01".into(),
                left: 300,
            },
        ];
        let row = classify_row(cells, "Date: 2024-01-01");
        assert_eq!(row.role, Role::MultiColumn);
        assert_eq!(row.texts(), vec!["Date:", "2024-01-01"]);
        assert!(row.cells.iter().all(|c| c.style == CellStyle::Plain));
    }

    #[test]
    fn colon_splits_on_first_occurrence() {
        let text = "Time: 10:30 AM";
        let row = classify_row(single(text), text);
        assert_eq!(row.role, Role::KeyValue);
        assert_eq!(row.texts(), vec!["Time", "10:30 AM"]);
        assert!(row.cells[0].is_emphasized());
        assert!(!row.cells[1].is_emphasized());
    }

    #[test]
    fn trailing_colon_gives_empty_value() {
        let row = classify_row(single("Remarks :"), "Remarks :");
        assert_eq!(row.role, Role::KeyValue);
        assert_eq!(row.texts(), vec!["Remarks", ""]);
    }

    #[test]
    fn key_value_beats_heading() {
        // Short and fully upper-case, but the colon wins.
        let row = classify_row(single("ID: 7"), "ID: 7");
        assert_eq!(row.role, Role::KeyValue);
        let row = classify_row(single("TOTAL: 100"), "TOTAL: 100");
        assert_eq!(row.role, Role::KeyValue);
    }

    #[test]
    fn leading_colon_is_not_a_key() {
        let row = classify_row(single(": note"), ": note");
        assert_eq!(row.role, Role::Heading);
        assert_eq!(row.texts(), vec![": note"]);
    }

    #[test]
    fn long_upper_case_line_is_heading() {
        let text = "TERMS AND CONDITIONS OF SALE AND DELIVERY";
        assert!(text.len() >= HEADING_MAX_CHARS);
        let row = classify_row(single(text), text);
        assert_eq!(row.role, Role::Heading);
        assert!(row.cells[0].is_emphasized());
    }

    #[test]
    fn long_mixed_case_line_is_plain() {
        let text = "Payment is due within thirty days of receipt";
        let row = classify_row(single(text), text);
        assert_eq!(row.role, Role::Plain);
        assert_eq!(row.cells, vec![Cell::plain(text)]);
    }

    #[test]
    fn length_boundary_is_exclusive() {
        let text29 = "a".repeat(29);
        let text30 = "a".repeat(30);
        assert_eq!(classify_row(single(&text29), &text29).role, Role::Heading);
        assert_eq!(classify_row(single(&text30), &text30).role, Role::Plain);
    }

    #[test]
    fn upper_needs_a_cased_letter() {
        assert!(is_upper("TOTAL 2024"));
        assert!(!is_upper("2024 - 12"));
        assert!(!is_upper("Total"));
        assert!(!is_upper("합계 금액"));
    }
}
