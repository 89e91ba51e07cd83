//! Heuristic parsing of free-text ingredient lines.
//!
//! Recipe ingredient lines ("1 cup flour", "2 tablespoons olive oil") are
//! split into amount / unit / name before being sent to the nutrition
//! estimator. The parser is lossy by design: it feeds a downstream
//! estimator, not an authoritative quantity system.

use crate::types::ParsedIngredientLine;
use regex::Regex;
use std::sync::LazyLock;

// Optional leading numeric-or-fraction token, optional alphabetic unit
// token, then the name. At least one whitespace must separate the name
// from what precedes it.
static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([\d./]+)?\s*([a-z]+)?\s+(.+)$").expect("line regex is valid")
});

/// Splits an ingredient line into structured parts.
///
/// `amount` is `None` when no leading numeric/fraction token is present or
/// the token does not evaluate to a finite number (so `"1/0"` degrades
/// instead of producing infinity). Fractions divide as floats.
///
/// Policy for the unit slot: an alphabetic token is only treated as a unit
/// when a leading amount was matched. A line with no leading number is
/// returned whole as the name, so `"olive oil"` never loses `"olive"` to
/// the unit slot.
pub fn parse_line(line: &str) -> ParsedIngredientLine {
    let trimmed = line.trim();

    if let Some(caps) = LINE_RE.captures(trimmed) {
        let amount_token = caps.get(1).map(|m| m.as_str());
        if let Some(token) = amount_token {
            return ParsedIngredientLine {
                name: caps[3].trim().to_string(),
                amount: parse_amount(token),
                unit: caps.get(2).map(|m| m.as_str().to_string()),
            };
        }
    }

    ParsedIngredientLine {
        name: trimmed.to_string(),
        amount: None,
        unit: None,
    }
}

/// Evaluates a numeric token, handling `a/b` fractions.
fn parse_amount(token: &str) -> Option<f64> {
    let value = match token.split_once('/') {
        Some((num, den)) => num.parse::<f64>().ok()? / den.parse::<f64>().ok()?,
        None => token.parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
}
