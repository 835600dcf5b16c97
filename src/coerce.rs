//! Lenient coercion of raw cell text into typed values.
//!
//! Every helper returns `None` instead of failing, so callers decide the
//! default. None of them ever produce `NaN` or an infinity.

/// Placeholder for categorical fields that were missing in the source row.
pub const MISSING: &str = "N/A";

/// Returns `true` for empty, whitespace-only, or [`MISSING`] values.
pub fn is_blank_or_sentinel(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == MISSING
}

/// Parses the leading integer of `s`, ignoring any trailing text.
///
/// `" 4 stars"` yields `Some(4)` and `"3.9"` yields `Some(3)`. Input with no
/// leading digits (including whitespace-only input) yields `None`.
pub fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }

    s[..end].parse().ok()
}

/// Parses the leading decimal number of `s`, ignoring any trailing text.
///
/// Accepts an optional sign, a fractional part and an exponent. Returns
/// `None` when no digits lead the input or the result is not finite.
pub fn parse_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let mut mantissa_digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        mantissa_digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
            mantissa_digits += 1;
        }
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }

    // Only consume an exponent when digits follow it.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a price such as `"$24.99"` or `"$1,200"`.
pub fn parse_currency(s: &str) -> Option<f64> {
    let cleaned: String = s.chars().filter(|c| *c != '$' && *c != ',').collect();
    parse_float(&cleaned)
}

/// Splits a multi-select cell on commas, trimming items and dropping empties.
pub fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Rounds half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// A measurement counts toward an average only when finite and strictly
/// positive. Zero doubles as the "not answered" default of the normalizer.
pub fn is_valid_measure(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Turns a camel-case field name into a display label.
///
/// `systemSatisfaction` becomes `System Satisfaction`.
pub fn humanize_field_name(name: &str) -> String {
    let mut label = String::with_capacity(name.len() + 4);

    for (i, c) in name.chars().enumerate() {
        if i == 0 {
            label.extend(c.to_uppercase());
        } else {
            if c.is_uppercase() {
                label.push(' ');
            }
            label.push(c);
        }
    }

    label
}
