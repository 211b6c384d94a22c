// Utility helpers for parsing and formatting.
//
// Sales exports are hand-edited often enough that every field is parsed
// forgivingly here, so the rest of the code can assume typed values.
use chrono::{NaiveDate, NaiveDateTime};
use num_format::{Locale, ToFormattedString};

use crate::error::PrepError;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Parse a quantity, stripping thousands separators.
///
/// Returns `None` for blanks and anything that is not a finite number;
/// exponent notation such as `1e3` is accepted.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a sales date. Time-of-day components are accepted and dropped.
pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
}

/// Strict `YYYY-MM-DD` parsing for user input.
pub fn parse_user_date(s: &str) -> Result<NaiveDate, PrepError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| PrepError::InvalidDate(s.trim().to_string()))
}

/// `Aug 01, 2025`
pub fn format_short_date(d: NaiveDate) -> String {
    d.format("%b %d, %Y").to_string()
}

/// `Friday, Aug 01, 2025`
pub fn format_long_date(d: NaiveDate) -> String {
    d.format("%A, %b %d, %Y").to_string()
}

pub fn format_qty(q: &f64) -> String {
    // Quantities are unit counts; show decimals only when the data has them.
    if q.fract() == 0.0 {
        format!("{:.0}", q)
    } else {
        format!("{:.2}", q)
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
