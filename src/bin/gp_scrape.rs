//! gp-scrape: Grand Prix race, grid, calendar and weather scraper.
//!
//! Usage:
//!   gp-scrape events   [--output events.json]
//!   gp-scrape grid     [--start-year 2005] [--end-year 2024] [--class MotoGP=MotoGP]
//!   gp-scrape calendar [--output calendar.json]
//!   gp-scrape weather  [--input calendar.json] [--output weather.json]
//!
//! Every run writes its records once at the end, plus a plain-text log of
//! everything that was skipped. Set `RUST_LOG=gp_scrape=debug` for progress.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use gp_scrape::output::{read_json, write_log, write_records, CsvRecord, Format};
use gp_scrape::scrape::{scrape_calendar, scrape_events, scrape_grid, scrape_weather};
use gp_scrape::{CalendarRace, Harvest, HttpFetcher, Options};

#[derive(Debug, Parser)]
#[command(name = "gp-scrape")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Output file (default: <command>.json, or grid.csv)
    #[arg(short, long, global = true, env = "GP_SCRAPE_OUTPUT")]
    output: Option<PathBuf>,

    /// Log file for skipped items (default: <command>.log)
    #[arg(long, global = true, env = "GP_SCRAPE_LOG")]
    log: Option<PathBuf>,

    /// Output format (default: csv for grid, json otherwise)
    #[arg(short, long, value_enum, global = true, env = "GP_SCRAPE_FORMAT")]
    format: Option<CliFormat>,

    /// First season
    #[arg(long, global = true, env = "GP_SCRAPE_START_YEAR")]
    start_year: Option<i32>,

    /// Last season (inclusive)
    #[arg(long, global = true, env = "GP_SCRAPE_END_YEAR")]
    end_year: Option<i32>,

    /// Number of list rows the events command processes
    #[arg(long, global = true, env = "GP_SCRAPE_LIMIT")]
    limit: Option<usize>,

    /// Pause between requests in milliseconds
    #[arg(long, global = true, env = "GP_SCRAPE_DELAY_MS")]
    delay_ms: Option<u64>,

    /// Report section to read, as HEADING_ID=CLASS (repeatable)
    #[arg(long = "class", global = true, value_parser = parse_class)]
    classes: Vec<(String, String)>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFormat {
    Json,
    Csv,
}

impl From<CliFormat> for Format {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Json => Format::Json,
            CliFormat::Csv => Format::Csv,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Event infoboxes from the English list of Grands Prix
    Events,

    /// Starting grid positions from Italian race reports
    Grid,

    /// Season calendars with circuit coordinates
    Calendar,

    /// Race-day weather for a calendar file
    Weather {
        /// Calendar JSON written by the calendar command
        #[arg(short, long, default_value = "calendar.json", env = "GP_SCRAPE_INPUT")]
        input: PathBuf,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Grid => "grid",
            Self::Calendar => "calendar",
            Self::Weather { .. } => "weather",
        }
    }

    fn default_format(&self) -> Format {
        match self {
            Self::Grid => Format::Csv,
            _ => Format::Json,
        }
    }
}

fn parse_class(value: &str) -> std::result::Result<(String, String), String> {
    let (id, label) = value
        .split_once('=')
        .ok_or_else(|| format!("expected HEADING_ID=CLASS, got {value:?}"))?;
    if id.trim().is_empty() || label.trim().is_empty() {
        return Err(format!("empty heading id or class in {value:?}"));
    }
    Ok((id.trim().to_string(), label.trim().to_string()))
}

impl Cli {
    fn options(&self) -> Options {
        let mut options = Options::default();
        if let Some(year) = self.start_year {
            options.start_year = year;
        }
        if let Some(year) = self.end_year {
            options.end_year = year;
        }
        if let Some(limit) = self.limit {
            options.event_limit = limit;
        }
        if let Some(ms) = self.delay_ms {
            options.request_delay = Duration::from_millis(ms);
        }
        if !self.classes.is_empty() {
            options.class_sections.clone_from(&self.classes);
        }
        options
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gp_scrape=info")),
        )
        .init();

    let cli = Cli::parse();
    let options = cli.options();
    let format = cli.format.map_or_else(|| cli.command.default_format(), Into::into);

    let name = cli.command.name();
    let extension = match format {
        Format::Json => "json",
        Format::Csv => "csv",
    };
    let output = cli.output.clone().unwrap_or_else(|| PathBuf::from(format!("{name}.{extension}")));
    let log = cli.log.clone().unwrap_or_else(|| PathBuf::from(format!("{name}.log")));

    let fetcher = HttpFetcher::new(&options).context("Failed to build HTTP client")?;

    match &cli.command {
        Command::Events => {
            let harvest =
                scrape_events(&fetcher, &options).context("Failed to read the list page")?;
            finish(&harvest, &output, &log, format)
        }
        Command::Grid => {
            let harvest = scrape_grid(&fetcher, &options)?;
            finish(&harvest, &output, &log, format)
        }
        Command::Calendar => {
            let harvest = scrape_calendar(&fetcher, &options)?;
            finish(&harvest, &output, &log, format)
        }
        Command::Weather { input } => {
            let races: Vec<CalendarRace> =
                read_json(input).with_context(|| format!("Failed to read {}", input.display()))?;
            let harvest = scrape_weather(&fetcher, &races, &options)?;
            finish(&harvest, &output, &log, format)
        }
    }
}

fn finish<T: Serialize + CsvRecord>(
    harvest: &Harvest<T>,
    output: &Path,
    log: &Path,
    format: Format,
) -> Result<()> {
    write_records(output, &harvest.records, format)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    write_log(log, &harvest.log).with_context(|| format!("Failed to write {}", log.display()))?;

    println!(
        "{} records saved to {} ({} skipped, see {})",
        harvest.len(),
        output.display(),
        harvest.log.len(),
        log.display()
    );
    Ok(())
}
