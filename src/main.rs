// Entry point and high-level CLI flow.
//
// Each location has a CSV export of last year's line-item sales. For a
// selected date we find the same weekday occurrence one year earlier, total
// that day's sales per item and apply the buffer the user picks.
// - `map` shows just the date mapping.
// - `forecast` prints (and optionally exports) one or all locations.
// - With no subcommand an interactive menu takes the place of per-location
//   tabs: pick a location, a date and a buffer, then go again or exit.
mod cli;
mod logging;

use std::collections::HashMap;
use std::io::{self, Write};
use std::process;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use tracing::{info, warn};

use smart_prep::config::{Location, PrepConfig};
use smart_prep::types::{ForecastRow, SalesRecord};
use smart_prep::{datemap, forecast, loader, output, util, DateMapping, MappingPath, PrepError};

use crate::cli::{Cli, Command, ForecastArgs, MapArgs};

/// Sales per location, read at most once per run.
struct Session {
    config: PrepConfig,
    sales: HashMap<String, Vec<SalesRecord>>,
}

impl Session {
    fn new(config: PrepConfig) -> Self {
        Self { config, sales: HashMap::new() }
    }

    fn sales(&mut self, loc: &Location) -> Result<&[SalesRecord], PrepError> {
        if !self.sales.contains_key(&loc.name) {
            let path = self.config.resolve(loc);
            let (records, report) = loader::load_sales(&path)?;
            println!(
                "Loaded {}: {} rows ({} kept)",
                loc.name,
                util::format_int(report.total_rows),
                util::format_int(report.kept_rows)
            );
            if report.parse_errors > 0 {
                warn!(location = %loc.name, rows = report.parse_errors, "rows skipped");
                println!(
                    "Note: {} rows skipped due to parse/validation errors.",
                    util::format_int(report.parse_errors)
                );
            }
            self.sales.insert(loc.name.clone(), records);
        }
        Ok(self.sales.get(&loc.name).map(Vec::as_slice).unwrap_or_default())
    }

    fn forecast(
        &mut self,
        loc: &Location,
        date: NaiveDate,
        pct: i32,
    ) -> Result<(DateMapping, Vec<ForecastRow>), PrepError> {
        let pct = self.config.buffer.check(pct)?;
        let mapping = datemap::map_with_path(date);
        let exclusions = self.config.exclusion_set();
        let rows = forecast::build_forecast(self.sales(loc)?, mapping.past, &exclusions, pct);
        info!(
            location = %loc.name,
            selected = %mapping.selected,
            past = %mapping.past,
            pct,
            items = rows.len(),
            "forecast built"
        );
        Ok((mapping, rows))
    }
}

fn print_forecast(loc: &Location, mapping: &DateMapping, rows: &[ForecastRow], max_rows: usize) {
    println!("{}\n", loc.name);
    println!("{}\n", output::mapping_line(mapping));
    println!("{}\n", output::prep_heading(mapping));
    output::preview_table(rows, max_rows);
}

/// Read one trimmed line after a prompt; `None` on end of input.
fn prompt(label: &str) -> Option<String> {
    print!("{}", label);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Ask whether to go back to location selection.
///
/// Returns `true` for `Y`, `false` for `N` or end of input.
fn prompt_back_to_menu() -> bool {
    loop {
        let Some(resp) = prompt("Back to Location Selection (Y/N): ") else {
            return false;
        };
        match resp.to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn prompt_date(session: &Session, loc: &Location) -> Option<NaiveDate> {
    let default = session.config.default_date;
    loop {
        let input = prompt(&format!(
            "Select a date for {} (YYYY-MM-DD, blank for {}): ",
            loc.name, default
        ))?;
        if input.is_empty() {
            return Some(default);
        }
        match util::parse_user_date(&input) {
            Ok(d) => return Some(d),
            Err(e) => println!("{}", e),
        }
    }
}

fn prompt_buffer(session: &Session) -> Option<i32> {
    let range = session.config.buffer;
    loop {
        let input = prompt(&format!(
            "Adjust by % buffer ({} to {}, blank for {}): ",
            range.min, range.max, range.default
        ))?;
        if input.is_empty() {
            return Some(range.default);
        }
        match input.trim_end_matches('%').parse::<i32>() {
            Ok(pct) => match range.check(pct) {
                Ok(pct) => return Some(pct),
                Err(e) => println!("{}", e),
            },
            Err(_) => println!("Invalid buffer. Please enter a whole number."),
        }
    }
}

fn run_interactive(session: &mut Session) -> Result<()> {
    let locations = session.config.locations.clone();
    loop {
        println!("Select Location:");
        for (idx, loc) in locations.iter().enumerate() {
            println!("[{}] {}", idx + 1, loc.name);
        }
        println!();
        let Some(choice) = prompt("Enter choice: ") else {
            return Ok(());
        };
        let picked = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| locations.get(i));
        let Some(loc) = picked else {
            println!("Invalid choice. Please enter 1 to {}.\n", locations.len());
            continue;
        };

        let Some(date) = prompt_date(session, loc) else { return Ok(()) };
        let Some(pct) = prompt_buffer(session) else { return Ok(()) };
        println!();

        match session.forecast(loc, date, pct) {
            Ok((mapping, rows)) => print_forecast(loc, &mapping, &rows, usize::MAX),
            Err(e) => eprintln!("Failed to build forecast: {}\n", e),
        }

        if !prompt_back_to_menu() {
            println!("Exiting the program.");
            return Ok(());
        }
    }
}

fn run_map(args: MapArgs) -> Result<()> {
    let date = util::parse_user_date(&args.date)?;
    let mapping = datemap::map_with_path(date);
    println!("{}", output::mapping_line(&mapping));
    let weekday = mapping.selected.format("%A");
    match mapping.path {
        MappingPath::Ordinal => println!(
            "Occurrence {} of {} in the month, matched last year.",
            mapping.ordinal, weekday
        ),
        MappingPath::Fallback => println!(
            "Occurrence {} of {} has no counterpart last year; shifted by one calendar year.",
            mapping.ordinal, weekday
        ),
    }
    Ok(())
}

fn run_forecast(session: &mut Session, args: ForecastArgs) -> Result<()> {
    let date = match args.date.as_deref() {
        Some(s) => util::parse_user_date(s)?,
        None => session.config.default_date,
    };
    let pct = args.buffer.unwrap_or(session.config.buffer.default);

    let targets: Vec<Location> = match args.location.as_deref() {
        Some(name) => vec![session.config.location(name)?.clone()],
        None => session.config.locations.clone(),
    };
    if targets.len() > 1 && (args.export.is_some() || args.summary.is_some()) {
        bail!("--export and --summary need a single --location");
    }

    for loc in &targets {
        let (mapping, rows) = session
            .forecast(loc, date, pct)
            .with_context(|| format!("failed to forecast {}", loc.name))?;
        print_forecast(loc, &mapping, &rows, args.rows);

        if let Some(path) = &args.export {
            output::write_csv(path, &rows)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("(Full table exported to {})\n", path.display());
        }
        if let Some(path) = &args.summary {
            let summary = forecast::summarize(&loc.name, &mapping, pct, &rows);
            output::write_json(path, &summary)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("(Summary written to {})\n", path.display());
        }
    }
    Ok(())
}

fn run_locations(config: &PrepConfig) {
    for loc in &config.locations {
        let path = config.resolve(loc);
        let status = if path.exists() { "" } else { " (missing)" };
        println!("{}: {}{}", loc.name, path.display(), status);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = PrepConfig::load(cli.config.as_deref()).context("failed to load config")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    let mut session = Session::new(config);

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Map(args) => run_map(args),
        Command::Forecast(args) => run_forecast(&mut session, args),
        Command::Locations => {
            run_locations(&session.config);
            Ok(())
        }
        Command::Interactive => run_interactive(&mut session),
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn session_with(dir: &tempfile::TempDir) -> Session {
        std::fs::write(
            dir.path().join("malibu.csv"),
            "Date,Item,Qty\n\
             2024-08-02,Oysters,10\n\
             2024-08-02,Oysters,5\n\
             2024-08-02,Beer,30\n\
             2024-08-01,Oysters,100\n",
        )
        .unwrap();
        let config = PrepConfig {
            data_dir: dir.path().to_path_buf(),
            locations: vec![Location { name: "Malibu".to_string(), file: PathBuf::from("malibu.csv") }],
            ..PrepConfig::default()
        };
        Session::new(config)
    }

    #[test]
    fn session_forecasts_from_mapped_date() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with(&dir);
        let loc = session.config.locations[0].clone();
        let date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();

        let (mapping, rows) = session.forecast(&loc, date, 20).unwrap();
        assert_eq!(mapping.past, NaiveDate::from_ymd_opt(2024, 8, 2).unwrap());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item, "Oysters");
        assert_eq!(rows[0].forecast_qty, 15.0);
        assert_eq!(rows[0].adjusted_qty, 18);
    }

    #[test]
    fn session_reads_each_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with(&dir);
        let loc = session.config.locations[0].clone();
        let date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
        session.forecast(&loc, date, 0).unwrap();

        std::fs::remove_file(dir.path().join("malibu.csv")).unwrap();
        let (_, rows) = session.forecast(&loc, date, 0).unwrap();
        assert_eq!(rows[0].forecast_qty, 15.0);
    }

    #[test]
    fn session_rejects_out_of_range_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with(&dir);
        let loc = session.config.locations[0].clone();
        let date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
        let err = session.forecast(&loc, date, 40).unwrap_err();
        assert!(matches!(err, PrepError::BufferOutOfRange { .. }));
    }
}
