use crate::datemap::DateMapping;
use crate::error::PrepError;
use crate::types::{ForecastRow, PrepSummary, SalesRecord};
use chrono::NaiveDate;
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

/// Allowed percentage buffer, inclusive on both ends.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BufferRange {
    #[serde(default = "default_min")]
    pub min: i32,
    #[serde(default = "default_max")]
    pub max: i32,
    #[serde(default)]
    pub default: i32,
}

fn default_min() -> i32 {
    -35
}

fn default_max() -> i32 {
    35
}

impl Default for BufferRange {
    fn default() -> Self {
        Self { min: default_min(), max: default_max(), default: 0 }
    }
}

impl BufferRange {
    pub fn check(&self, pct: i32) -> Result<i32, PrepError> {
        if (self.min..=self.max).contains(&pct) {
            Ok(pct)
        } else {
            Err(PrepError::BufferOutOfRange { pct, min: self.min, max: self.max })
        }
    }
}

/// Per-item unit totals for one day. Missing quantities count as nothing.
pub fn aggregate_for_date(records: &[SalesRecord], date: NaiveDate) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for r in records.iter().filter(|r| r.date == date) {
        *totals.entry(r.item.clone()).or_insert(0.0) += r.qty.unwrap_or(0.0);
    }
    totals
}

/// Apply a percentage buffer, rounding half to even.
pub fn adjust(forecast: f64, pct: i32) -> i64 {
    (forecast * (1.0 + pct as f64 / 100.0)).round_ties_even() as i64
}

pub fn build_forecast(
    records: &[SalesRecord],
    past: NaiveDate,
    exclusions: &HashSet<String>,
    pct: i32,
) -> Vec<ForecastRow> {
    let mut rows: Vec<ForecastRow> = aggregate_for_date(records, past)
        .into_iter()
        .filter(|(item, _)| !exclusions.contains(item))
        .map(|(item, forecast_qty)| ForecastRow {
            item,
            forecast_qty,
            adjusted_qty: adjust(forecast_qty, pct),
        })
        .collect();
    // Rows arrive in item order, so the stable sort keeps ties alphabetical.
    rows.sort_by(|a, b| b.forecast_qty.partial_cmp(&a.forecast_qty).unwrap_or(Ordering::Equal));
    rows
}

pub fn summarize(location: &str, mapping: &DateMapping, pct: i32, rows: &[ForecastRow]) -> PrepSummary {
    PrepSummary {
        location: location.to_string(),
        selected_date: mapping.selected,
        past_date: mapping.past,
        mapping: mapping.path,
        buffer_pct: pct,
        total_items: rows.len(),
        total_forecast: rows.iter().map(|r| r.forecast_qty).sum(),
        total_adjusted: rows.iter().map(|r| r.adjusted_qty).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datemap::map_with_path;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rec(date: NaiveDate, item: &str, qty: Option<f64>) -> SalesRecord {
        SalesRecord { date, item: item.to_string(), qty }
    }

    fn sample() -> Vec<SalesRecord> {
        let day = ymd(2024, 8, 2);
        let other = ymd(2024, 8, 3);
        vec![
            rec(day, "Oysters", Some(10.0)),
            rec(day, "Oysters", Some(14.0)),
            rec(day, "Clam Chowder", Some(7.0)),
            rec(day, "Draft Beer", Some(40.0)),
            rec(day, "Lobster Roll", None),
            rec(day, "Crab Cake", Some(7.0)),
            rec(other, "Oysters", Some(99.0)),
        ]
    }

    fn exclusions() -> HashSet<String> {
        ["Draft Beer".to_string()].into_iter().collect()
    }

    #[test]
    fn aggregates_one_day_per_item() {
        let totals = aggregate_for_date(&sample(), ymd(2024, 8, 2));
        assert_eq!(totals.get("Oysters"), Some(&24.0));
        assert_eq!(totals.get("Lobster Roll"), Some(&0.0));
        assert_eq!(totals.len(), 5);
    }

    #[test]
    fn forecast_excludes_and_sorts_descending() {
        let rows = build_forecast(&sample(), ymd(2024, 8, 2), &exclusions(), 0);
        let items: Vec<&str> = rows.iter().map(|r| r.item.as_str()).collect();
        assert_eq!(items, ["Oysters", "Clam Chowder", "Crab Cake", "Lobster Roll"]);
        assert_eq!(rows[0].adjusted_qty, 24);
    }

    #[test]
    fn exclusions_are_exact_matches() {
        let mut ex = exclusions();
        ex.insert("oysters".to_string());
        let rows = build_forecast(&sample(), ymd(2024, 8, 2), &ex, 0);
        assert!(rows.iter().any(|r| r.item == "Oysters"));
    }

    #[test]
    fn no_sales_on_date_is_empty() {
        assert!(build_forecast(&sample(), ymd(2023, 1, 1), &exclusions(), 10).is_empty());
    }

    #[test]
    fn buffer_rounds_half_to_even() {
        assert_eq!(adjust(24.0, 10), 26);
        assert_eq!(adjust(24.0, -35), 16);
        assert_eq!(adjust(10.0, 25), 12); // 12.5
        assert_eq!(adjust(10.0, 35), 14); // 13.5
        assert_eq!(adjust(0.0, 35), 0);
    }

    #[test]
    fn buffer_range_is_inclusive() {
        let range = BufferRange::default();
        assert_eq!(range.check(-35).unwrap(), -35);
        assert_eq!(range.check(35).unwrap(), 35);
        assert!(matches!(range.check(36), Err(PrepError::BufferOutOfRange { pct: 36, .. })));
    }

    #[test]
    fn summary_totals() {
        let mapping = map_with_path(ymd(2025, 8, 1));
        let rows = build_forecast(&sample(), mapping.past, &exclusions(), 10);
        let s = summarize("Malibu", &mapping, 10, &rows);
        assert_eq!(s.past_date, ymd(2024, 8, 2));
        assert_eq!(s.total_items, 4);
        assert_eq!(s.total_forecast, 38.0);
        // 26 + 8 (7.7) + 8 + 0
        assert_eq!(s.total_adjusted, 42);
    }
}
