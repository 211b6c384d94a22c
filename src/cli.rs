use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Same-weekday-last-year prep forecasts per location.
#[derive(Parser)]
#[command(
    name = "smart-prep",
    version,
    about = "Prep quantities from last year's same-weekday sales"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to TOML configuration file (default: smart_prep.toml if present).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the location CSV exports; overrides the config.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Subcommand to run; interactive menu when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show which date last year a date maps to.
    Map(MapArgs),
    /// Print the prep forecast for one or all locations.
    Forecast(ForecastArgs),
    /// List configured locations.
    Locations,
    /// Menu-driven session (the default).
    Interactive,
}

#[derive(clap::Args)]
pub struct MapArgs {
    /// Date to map, YYYY-MM-DD.
    #[arg(short, long)]
    pub date: String,
}

#[derive(clap::Args)]
pub struct ForecastArgs {
    /// Location name (case-insensitive).
    #[arg(short, long, conflicts_with = "all", required_unless_present = "all")]
    pub location: Option<String>,

    /// Forecast every configured location.
    #[arg(long)]
    pub all: bool,

    /// Date to prep for, YYYY-MM-DD; defaults to the configured date.
    #[arg(short, long)]
    pub date: Option<String>,

    /// Percentage buffer applied to last year's quantities.
    #[arg(short, long, allow_negative_numbers = true)]
    pub buffer: Option<i32>,

    /// Maximum rows to print.
    #[arg(long, default_value_t = 50)]
    pub rows: usize,

    /// Write the full forecast table to this CSV file.
    #[arg(long, requires = "location", conflicts_with = "all")]
    pub export: Option<PathBuf>,

    /// Write a JSON summary to this file.
    #[arg(long, requires = "location", conflicts_with = "all")]
    pub summary: Option<PathBuf>,
}
