use crate::error::PrepError;
use crate::types::{RawRow, SalesRecord};
use crate::util::{parse_date_safe, parse_f64_safe};
use csv::ReaderBuilder;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    pub parse_errors: usize,
    pub coerced_qty: usize,
}

pub fn load_sales(path: &Path) -> Result<(Vec<SalesRecord>, LoadReport), PrepError> {
    let file = std::fs::File::open(path).map_err(|e| PrepError::io(path, e))?;
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(file);
    let mut report = LoadReport::default();
    let mut records: Vec<SalesRecord> = Vec::new();

    for result in rdr.deserialize::<RawRow>() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                debug!(row = report.total_rows, error = %e, "unreadable row");
                report.parse_errors += 1;
                continue;
            }
        };

        let date = match parse_date_safe(row.date.as_deref()) {
            Some(d) => d,
            None => { report.parse_errors += 1; continue; }
        };
        let item = match row.item.as_deref().map(str::trim) {
            Some(i) if !i.is_empty() => i.to_string(),
            _ => { report.parse_errors += 1; continue; }
        };

        // Non-numeric quantities are kept as "no value" rather than dropped.
        let qty = parse_f64_safe(row.qty.as_deref());
        if qty.is_none() {
            report.coerced_qty += 1;
        }

        records.push(SalesRecord { date, item, qty });
    }

    report.kept_rows = records.len();
    info!(
        path = %path.display(),
        total = report.total_rows,
        kept = report.kept_rows,
        parse_errors = report.parse_errors,
        coerced_qty = report.coerced_qty,
        "sales loaded"
    );
    Ok((records, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;

    fn write_csv(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("sales.csv");
        let mut f = std::fs::File::create(&path).expect("create csv");
        f.write_all(body.as_bytes()).expect("write csv");
        path
    }

    #[test]
    fn loads_and_normalizes_rows() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_csv(
            &dir,
            "Date,Item,Qty,Net Sales\n\
             2024-08-02,Oysters,12,30.00\n\
             08/02/2024, Clam Chowder ,3,9.00\n\
             2024-08-02 18:30:00,Lobster Roll,abc,0\n\
             not a date,Oysters,1,1\n\
             2024-08-03,,4,1\n",
        );

        let (records, report) = load_sales(&path).expect("load");
        assert_eq!(report.total_rows, 5);
        assert_eq!(report.kept_rows, 3);
        assert_eq!(report.parse_errors, 2);
        assert_eq!(report.coerced_qty, 1);

        let day = NaiveDate::from_ymd_opt(2024, 8, 2).unwrap();
        assert!(records.iter().all(|r| r.date == day));
        assert_eq!(records[1].item, "Clam Chowder");
        assert_eq!(records[2].qty, None);
    }

    #[test]
    fn tolerates_short_rows() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_csv(&dir, "Date,Item,Qty\n2024-08-02,Oysters\n");
        let (records, report) = load_sales(&path).expect("load");
        assert_eq!(report.kept_rows, 1);
        assert_eq!(records[0].qty, None);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = load_sales(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, PrepError::Io { .. }));
    }
}
