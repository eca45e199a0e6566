//! Text/number conversions with the browser's `Number(text)` semantics.
//!
//! Form fields and the range widget exchange values as text, so both sides of
//! the price sync go through these helpers.

use std::sync::LazyLock;

use fancy_regex::Regex;

// Decimal literal grammar accepted by `Number(text)` after trimming.
static DECIMAL_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$")
        .expect("decimal literal grammar is a valid pattern")
});

/// Converts text to a number the way `Number(text)` does.
///
/// Surrounding whitespace is ignored and blank text is `0`. Besides decimal
/// literals, `Infinity` (optionally signed) and unsigned `0x`/`0o`/`0b`
/// integers are accepted; anything else is NaN.
pub fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if let Some(value) = parse_radix_integer(trimmed) {
        return value;
    }

    // A backtracking limit hit on pathological input counts as no match.
    let is_decimal = DECIMAL_LITERAL.is_match(trimmed).unwrap_or(false);
    if !is_decimal {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_radix_integer(text: &str) -> Option<f64> {
    let prefix = text.get(..2)?.to_ascii_lowercase();
    let radix = match prefix.as_str() {
        "0x" => 16,
        "0o" => 8,
        "0b" => 2,
        _ => return None,
    };
    let digits = &text[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let mut value = 0f64;
    for ch in digits.chars() {
        let Some(digit) = ch.to_digit(radix) else {
            return Some(f64::NAN);
        };
        value = value * f64::from(radix) + f64::from(digit);
    }
    Some(value)
}

/// Formats a number the way assigning it to an input's `value` renders it.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".into();
    }
    if value.is_infinite() {
        return if value > 0.0 {
            "Infinity".into()
        } else {
            "-Infinity".into()
        };
    }
    if value == 0.0 {
        // Covers negative zero.
        return "0".into();
    }
    format!("{value}")
}
