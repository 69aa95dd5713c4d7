//! Answer normalization and numeric value parsing.

use crate::config::GradingConfig;
use crate::error::ArithmeticError;

/// Text after normalization, plus anything that went wrong along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub text: String,
    pub diagnostics: Vec<String>,
}

/// Returns `true` if `s` is a signed decimal number such as `-3`, `0.25` or `342.00`.
pub fn is_numeric(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let (whole, frac) = match digits.split_once('.') {
        Some((whole, frac)) => (whole, Some(frac)),
        None => (digits, None),
    };
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    all_digits(whole) && frac.map_or(true, all_digits)
}

/// Parse a signed decimal number. Exponents, `inf` and `NaN` are not numbers here.
pub fn parse_number(s: &str) -> Option<f64> {
    if is_numeric(s) {
        s.parse().ok()
    } else {
        None
    }
}

/// Format a value with at most two decimal places and no trailing zeros.
pub fn format_two_places(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    // Avoid printing "-0".
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}")
}

/// Convert `numerator/denominator` to its rounded quotient.
///
/// Returns `Ok(None)` when the text is not a simple fraction.
pub fn convert_fraction(text: &str) -> Result<Option<String>, ArithmeticError> {
    let Some((numerator, denominator)) = text.split_once('/') else {
        return Ok(None);
    };
    let (Some(numerator), Some(denominator)) = (
        parse_number(numerator.trim()),
        parse_number(denominator.trim()),
    ) else {
        return Ok(None);
    };
    if denominator == 0.0 {
        return Err(ArithmeticError::DivisionByZero(text.to_string()));
    }
    Ok(Some(format_two_places(numerator / denominator)))
}

/// Remove every whitespace character.
pub fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Normalize answer text for comparison: lowercase, whitespace, fractions.
pub fn normalize(raw: &str, config: &GradingConfig) -> Normalized {
    let lowered = raw.trim().to_lowercase();
    let mut text = if config.preserve_spacing {
        lowered
    } else {
        strip_whitespace(&lowered)
    };
    let mut diagnostics = Vec::new();

    if config.convert_fractions_to_decimals {
        match convert_fraction(&text) {
            Ok(Some(decimal)) => text = decimal,
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("{e}; leaving answer unconverted");
                diagnostics.push(e.to_string());
            }
        }
    }

    Normalized { text, diagnostics }
}
