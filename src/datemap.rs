// Same-weekday-occurrence date mapping.
//
// A selected date such as "the 1st Friday of August 2025" is mapped to "the
// 1st Friday of August 2024". When the prior year's month has no such
// occurrence the date is shifted back one calendar year instead.
use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;
use tracing::debug;

/// Which rule produced the prior-year date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingPath {
    Ordinal,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateMapping {
    pub selected: NaiveDate,
    pub past: NaiveDate,
    pub ordinal: u32,
    pub path: MappingPath,
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

/// 1-based occurrence of `d`'s weekday within its month, counting day 1
/// through `d.day()` inclusive.
pub fn ordinal_of(d: NaiveDate) -> u32 {
    (d.day() - 1) / 7 + 1
}

/// Map `d` to the same ordinal weekday of the same month one year earlier.
///
/// Always returns a date in `d.year() - 1`, except for dates in the year of
/// `NaiveDate::MIN`: chrono has no earlier year, so those are returned
/// unchanged.
pub fn map_to_prior_year(d: NaiveDate) -> NaiveDate {
    map_with_path(d).past
}

/// Like [`map_to_prior_year`], but also reports the ordinal and the rule used.
pub fn map_with_path(d: NaiveDate) -> DateMapping {
    let weekday = d.weekday();
    let ordinal = ordinal_of(d);
    let target_year = d.year() - 1;

    // `None` only when the target year is below NaiveDate::MIN.
    if let Some(first) = NaiveDate::from_ymd_opt(target_year, d.month(), 1) {
        let month_len = days_in_month(target_year, d.month()) as usize;
        let mut count = 0;
        for cand in first.iter_days().take(month_len) {
            if cand.weekday() == weekday {
                count += 1;
                if count == ordinal {
                    debug!(selected = %d, past = %cand, ordinal, "mapped by weekday occurrence");
                    return DateMapping {
                        selected: d,
                        past: cand,
                        ordinal,
                        path: MappingPath::Ordinal,
                    };
                }
            }
        }
    }

    // Month ran out of matching weekdays; chrono clamps Feb 29 to Feb 28.
    // Below NaiveDate::MIN there is no prior year, so the date is kept.
    let past = d.checked_sub_months(Months::new(12)).unwrap_or(d);
    debug!(selected = %d, past = %past, ordinal, "fell back to calendar year shift");
    DateMapping { selected: d, past, ordinal, path: MappingPath::Fallback }
}
