//! Shared coercion helpers.
//!
//! Survey exports contain blanks, text placeholders and the odd stray
//! character. Every statistic coerces its inputs through the helpers here
//! rather than trusting the ingestion layer.

/// Value substituted for missing or non-numeric answers.
///
/// Zero-filling biases composites downward instead of dropping the
/// respondent; all composite formulas use the same policy.
pub const DEFAULT_FILL: f64 = 0.0;

/// Characters commonly used in numeric formatting that should be stripped.
pub const NUMERIC_FORMAT_CHARS: [char; 4] = [',', '%', '$', ' '];

/// Common missing-value markers in survey exports.
pub const MISSING_MARKERS: [&str; 6] = ["", "n/a", "na", "null", "none", "-"];

/// Coerce an optional answer to a finite number.
///
/// `None`, NaN and infinities map to `default`.
#[inline]
pub fn safe_number(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => default,
    }
}

/// Coerce a slice of raw values, replacing non-finite entries with [`DEFAULT_FILL`].
pub fn coerce_all(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .map(|v| safe_number(Some(*v), DEFAULT_FILL))
        .collect()
}

/// Check if a string is a missing-value marker.
pub fn is_missing_marker(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    MISSING_MARKERS.iter().any(|&marker| lower == marker)
}

/// Try to parse a string as a numeric value (f64).
///
/// Strips thousands separators and percent signs first.
pub fn parse_numeric_string(s: &str) -> Option<f64> {
    if is_missing_marker(s) {
        return None;
    }
    let mut cleaned = s.trim().to_string();
    for c in NUMERIC_FORMAT_CHARS {
        cleaned = cleaned.replace(c, "");
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Split a multi-select answer ("1,3,4") into its non-blank tokens.
pub fn safe_split<'a>(value: &'a str, delimiter: char) -> Vec<&'a str> {
    value
        .split(delimiter)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

/// Format a value the way the labels fall back: integers without decimals.
pub fn format_code(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
