// Utility helpers for parsing, guarded arithmetic and number formatting.
//
// Missing or unusable values are `None` everywhere; nothing here ever turns
// an unknown into zero.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in spreadsheet exports.
///
/// - Trims whitespace and strips thousands separators and a trailing `%`.
/// - Accepts scientific notation (`1.5e3`).
/// - Returns `None` for anything that cannot be parsed into a finite number,
///   which covers `"n/a"`, `"NaN"` and `"inf"`.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    let s = s.strip_suffix('%').unwrap_or(s).trim();
    if s.is_empty() || s == "-" {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().and_then(finite)
}

/// Dates come as full days (`2024-03-31`, `2024/03/31`) or as bare months
/// (`2024-03`, `202403`); a bare month maps to its first day.
pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 6 && (s.len() == 6 || s.len() == 7) {
        let year = digits[..4].parse::<i32>().ok()?;
        let month = digits[4..].parse::<u32>().ok()?;
        return NaiveDate::from_ymd_opt(year, month, 1);
    }
    None
}

pub fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// `a / b` when the denominator is strictly positive, otherwise `None`.
pub fn positive_div(a: f64, b: f64) -> Option<f64> {
    if b > 0.0 {
        finite(a / b)
    } else {
        None
    }
}

pub fn opt_sub(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    finite(a? - b?)
}

/// Growth of `current` over `prior` in percent; `None` without a positive base.
pub fn pct_change(current: f64, prior: f64) -> Option<f64> {
    positive_div(current - prior, prior).map(|g| g * 100.0)
}

/// Arithmetic mean that skips absent values; `None` when nothing is present.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().copied().sum();
    finite(sum / values.len() as f64)
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals with locale-aware thousands separators (`1,234,567.89`).
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Past u128 the digits are printed without separators.
    let mut res = match int_part.parse::<u128>() {
        Ok(v) => v.to_formatted_string(&Locale::en),
        Err(_) => int_part.to_string(),
    };
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_opt(n: Option<f64>, decimals: usize) -> String {
    n.map(|v| format_number(v, decimals)).unwrap_or_else(|| "n/a".to_string())
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
