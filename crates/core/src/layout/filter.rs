//! Token filter: the noise gate in front of line grouping.
//!
//! OCR engines emit many low-confidence fragments (punctuation flecks, scan
//! artifacts). Everything at or below the confidence threshold, and every
//! token that is blank after trimming, is dropped here.

use super::types::{RawToken, Token};

/// Confidence assigned to values that cannot be parsed.
pub const MALFORMED_CONFIDENCE: i32 = -1;

/// Parse an engine-reported confidence.
///
/// Accepts integers and decimals (`"96.58"` becomes 96, truncated toward
/// zero). Finite values outside the `i32` range saturate. Anything else,
/// including infinities and NaN, becomes [`MALFORMED_CONFIDENCE`].
pub fn parse_confidence(raw: &str) -> i32 {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<i32>() {
        return v;
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => v.trunc().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32,
        _ => MALFORMED_CONFIDENCE,
    }
}

/// Whether a parsed token passes the gate.
///
/// A negative confidence is below any threshold, even a negative one.
pub fn keep_token(token: &Token, min_confidence: i32) -> bool {
    token.confidence >= 0 && token.confidence > min_confidence && !token.text.trim().is_empty()
}

/// Filter already-parsed tokens, trimming the text of survivors.
///
/// Idempotent: filtering the output again changes nothing.
pub fn filter_tokens<I>(tokens: I, min_confidence: i32) -> Vec<Token>
where
    I: IntoIterator<Item = Token>,
{
    tokens
        .into_iter()
        .filter(|t| keep_token(t, min_confidence))
        .map(|t| Token {
            text: t.text.trim().to_string(),
            ..t
        })
        .collect()
}

/// Parse confidences of raw engine output and filter the result.
pub fn filter_raw_tokens<I>(raw: I, min_confidence: i32) -> Vec<Token>
where
    I: IntoIterator<Item = RawToken>,
{
    filter_tokens(
        raw.into_iter().map(|r| Token {
            confidence: parse_confidence(&r.confidence),
            text: r.text,
            left: r.left,
            top: r.top,
        }),
        min_confidence,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_confidence_accepts_integers_and_decimals() {
        assert_eq!(parse_confidence("95"), 95);
        assert_eq!(parse_confidence(" 42 "), 42);
        assert_eq!(parse_confidence("96.58"), 96);
        assert_eq!(parse_confidence("-1"), -1);
        assert_eq!(parse_confidence("0.9"), 0);
    }

    #[test]
    fn parse_confidence_coerces_garbage() {
        for raw in ["", "abc", "NaN", "inf", "-inf", "9O"] {
            assert_eq!(parse_confidence(raw), MALFORMED_CONFIDENCE, "{raw:?}");
        }
    }

    #[test]
    fn parse_confidence_saturates_huge_numbers() {
        assert_eq!(parse_confidence("1e99"), i32::MAX);
        assert_eq!(parse_confidence("-1e99"), i32::MIN);
        let kept = filter_raw_tokens(vec![RawToken::new("big", 0, 0, "1e99")], 30);
        assert_eq!(kept, vec![Token::new("big", 0, 0, i32::MAX)]);
    }

    #[test]
    fn threshold_is_strict() {
        let tokens = vec![
            Token::new("at", 0, 0, 30),
            Token::new("above", 0, 0, 31),
            Token::new("below", 0, 0, 29),
        ];
        let kept = filter_tokens(tokens, 30);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].text, "above");
    }

    #[test]
    fn blank_tokens_are_dropped_and_survivors_trimmed() {
        let tokens = vec![
            Token::new("   ", 0, 0, 99),
            Token::new("", 0, 0, 99),
            Token::new("  Qty\t", 40, 0, 99),
        ];
        let kept = filter_tokens(tokens, 30);
        assert_eq!(kept, vec![Token::new("Qty", 40, 0, 99)]);
    }

    #[test]
    fn malformed_confidence_never_survives() {
        let raw = vec![
            RawToken::new("ghost", 10, 10, "n/a"),
            RawToken::new("real", 10, 10, "88.0"),
        ];
        let kept = filter_raw_tokens(raw, -5);
        assert_eq!(kept, vec![Token::new("real", 10, 10, 88)]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let tokens = vec![
            Token::new(" a ", 0, 0, 50),
            Token::new("b", 0, 0, 10),
            Token::new("c", 0, 0, -1),
            Token::new("d ", 0, 0, 31),
        ];
        let once = filter_tokens(tokens, 30);
        let twice = filter_tokens(once.clone(), 30);
        assert_eq!(once, twice);
    }
}
