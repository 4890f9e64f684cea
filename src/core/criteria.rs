//! Criterion matching for the COUNTIF/SUMIF family.
//!
//! A criterion is either a comparison (`>10`, `<=5000`) or a bare string
//! matched case-insensitively. Invalid numeric input never errors; the
//! comparison is simply false.

/// Evaluate one criterion against one cell value.
///
/// Operator prefixes are checked longest-first so `>=` is not read as `>`
/// followed by a stray `=`.
pub fn matches(cell_value: &str, criterion: &str) -> bool {
    if let Some(rest) = criterion.strip_prefix(">=") {
        return compare(cell_value, rest, |a, b| a >= b);
    }
    if let Some(rest) = criterion.strip_prefix("<=") {
        return compare(cell_value, rest, |a, b| a <= b);
    }
    if let Some(rest) = criterion.strip_prefix('>') {
        return compare(cell_value, rest, |a, b| a > b);
    }
    if let Some(rest) = criterion.strip_prefix('<') {
        return compare(cell_value, rest, |a, b| a < b);
    }
    cell_value.to_lowercase() == criterion.to_lowercase()
}

fn compare(cell_value: &str, target: &str, op: impl Fn(f64, f64) -> bool) -> bool {
    match (parse_number(cell_value), parse_number(target)) {
        (Some(a), Some(b)) => op(a, b),
        _ => false,
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse().ok()
}
