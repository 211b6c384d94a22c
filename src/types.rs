use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::datemap::MappingPath;
use crate::util::format_qty;

/// One line of a point-of-sale export as it appears on disk.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Date")]
    pub date: Option<String>,
    #[serde(rename = "Item")]
    pub item: Option<String>,
    #[serde(rename = "Qty")]
    pub qty: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub item: String,
    /// `None` when the export held something non-numeric.
    pub qty: Option<f64>,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct ForecastRow {
    #[serde(rename = "Item")]
    #[tabled(rename = "Item")]
    pub item: String,
    #[serde(rename = "Forecast Qty")]
    #[tabled(rename = "Forecast Qty", display_with = "format_qty")]
    pub forecast_qty: f64,
    #[serde(rename = "Adjusted Qty")]
    #[tabled(rename = "Adjusted Qty")]
    pub adjusted_qty: i64,
}

#[derive(Debug, Serialize)]
pub struct PrepSummary {
    pub location: String,
    pub selected_date: NaiveDate,
    pub past_date: NaiveDate,
    pub mapping: MappingPath,
    pub buffer_pct: i32,
    pub total_items: usize,
    pub total_forecast: f64,
    pub total_adjusted: i64,
}
