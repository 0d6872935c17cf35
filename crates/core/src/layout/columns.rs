//! Column segmentation within a single line.

use super::types::{ColumnCell, Token};

/// Assumed glyph advance in pixels used to estimate token width.
pub const ESTIMATED_CHAR_WIDTH: i32 = 10;

/// Approximate rendered width of a token: character count times a fixed
/// advance. Proportional and wide (CJK) glyphs are mis-estimated.
pub fn estimated_width(text: &str) -> i32 {
    let chars = i32::try_from(text.chars().count()).unwrap_or(i32::MAX);
    chars.saturating_mul(ESTIMATED_CHAR_WIDTH)
}

/// Tokens of a line in reading order: by left edge, with ties broken by
/// top, then text, so the order never depends on arrival order.
pub fn order_left_to_right(tokens: &[Token]) -> Vec<&Token> {
    let mut ordered: Vec<&Token> = tokens.iter().collect();
    ordered.sort_by(|a, b| {
        a.left
            .cmp(&b.left)
            .then_with(|| a.top.cmp(&b.top))
            .then_with(|| a.text.cmp(&b.text))
    });
    ordered
}

/// Split one line's tokens into left-to-right column cells.
///
/// A token opens a new cell when the gap between its left edge and the
/// estimated right edge of the previously consumed token exceeds
/// `column_gap`; otherwise its text is appended to the current cell. The
/// right edge always comes from the last token, not the whole cell.
///
/// Returns between 1 and `tokens.len()` cells for a non-empty line.
pub fn segment_columns(tokens: &[Token], column_gap: i32) -> Vec<ColumnCell> {
    let mut cells: Vec<ColumnCell> = Vec::new();
    let mut prev_right_edge = 0i32;

    for token in order_left_to_right(tokens) {
        match cells.last_mut() {
            Some(last) if token.left.saturating_sub(prev_right_edge) <= column_gap => {
                last.text.push(' ');
                last.text.push_str(&token.text);
            }
            _ => cells.push(ColumnCell {
                text: token.text.clone(),
                left: token.left,
            }),
        }
        prev_right_edge = token.left.saturating_add(estimated_width(&token.text));
    }

    cells
}
