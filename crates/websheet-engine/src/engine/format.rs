//! Numeric parsing, rounding and display of cell values.

use regex::Regex;
use std::sync::OnceLock;

/// Parse the longest numeric prefix of `text`, the way a browser's `parseFloat` does.
///
/// Leading whitespace is skipped; `"12px"` yields 12 and `"x"` yields None.
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let m = number_prefix_re().find(text)?;
    let literal = m.as_str();
    match literal.trim_start_matches(['+', '-']) {
        "Infinity" if literal.starts_with('-') => Some(f64::NEG_INFINITY),
        "Infinity" => Some(f64::INFINITY),
        _ => literal.parse::<f64>().ok(),
    }
}

fn number_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
            .expect("number prefix regex must compile")
    })
}

/// Most decimals an f64 result can meaningfully be rounded to.
pub const MAX_DECIMAL_PLACES: u32 = 15;

/// Round half-up to `places` decimals (`Math.round(value * 10^p) / 10^p`).
/// `places` is clamped to [`MAX_DECIMAL_PLACES`].
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places.min(MAX_DECIMAL_PLACES) as i32);
    let rounded = (value * factor + 0.5).floor() / factor;
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Format a number as text for display, export and substitution into expressions.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}
