use crate::datemap::{DateMapping, MappingPath};
use crate::error::PrepError;
use crate::util::{format_long_date, format_short_date};
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), PrepError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush().map_err(|e| PrepError::io(path, e))?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PrepError> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s).map_err(|e| PrepError::io(path, e))?;
    Ok(())
}

/// `Mapping: **Aug 01, 2025** → **Aug 02, 2024**`, flagged when the
/// calendar-year fallback was used.
pub fn mapping_line(m: &DateMapping) -> String {
    let mut line = format!(
        "Mapping: **{}** → **{}**",
        format_short_date(m.selected),
        format_short_date(m.past)
    );
    if m.path == MappingPath::Fallback {
        line.push_str(" (no matching weekday, same date last year)");
    }
    line
}

pub fn prep_heading(m: &DateMapping) -> String {
    format!("Prep for {}", format_long_date(m.selected))
}

pub fn render_table<T>(rows: &[T], max_rows: usize) -> Option<String>
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return None;
    }
    Some(Table::new(slice).with(Style::markdown()).to_string())
}

pub fn preview_table<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    match render_table(rows, max_rows) {
        Some(table) => println!("{}\n", table),
        None => println!("(no rows)\n"),
    }
}
