//! Bulk writers for a finished run.
//!
//! JSON output is an array of flat objects, indented by two spaces, with
//! non-ASCII text written as-is. CSV output has a fixed header row and one
//! line per record. Both are written once, at the end of a run.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::collector::RunLog;
use crate::result::{CalendarRace, GridEntry, RaceEvent, WeatherRecord};
use crate::Result;

/// Output format for record files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Json,
    Csv,
}

/// A record with a fixed CSV column layout.
pub trait CsvRecord {
    /// Column names, in output order.
    const HEADER: &'static [&'static str];

    /// Field values in [`Self::HEADER`] order. Missing values are empty.
    fn csv_row(&self) -> Vec<String>;
}

fn opt_string(value: Option<&String>) -> String {
    value.cloned().unwrap_or_default()
}

fn opt_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl CsvRecord for RaceEvent {
    const HEADER: &'static [&'static str] = &["Official name", "Date", "Location", "Course"];

    fn csv_row(&self) -> Vec<String> {
        vec![
            opt_string(self.official_name.as_ref()),
            opt_string(self.date.as_ref()),
            opt_string(self.location.as_ref()),
            opt_string(self.course.as_ref()),
        ]
    }
}

impl CsvRecord for GridEntry {
    const HEADER: &'static [&'static str] =
        &["Year", "Date", "Circuit", "OfficialName", "Class", "RiderName", "Position"];

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.year.to_string(),
            self.date.clone(),
            self.circuit.clone(),
            self.official_name.clone(),
            self.class.clone(),
            self.rider_name.clone(),
            self.position.clone(),
        ]
    }
}

impl CsvRecord for CalendarRace {
    const HEADER: &'static [&'static str] = &[
        "Year",
        "Date",
        "Circuit",
        "OfficialName",
        "Course",
        "NightRace",
        "Latitude",
        "Longitude",
    ];

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.year.to_string(),
            self.date.clone(),
            self.circuit.clone(),
            self.official_name.clone(),
            self.course.clone(),
            self.night_race.to_string(),
            opt_number(self.latitude),
            opt_number(self.longitude),
        ]
    }
}

impl CsvRecord for WeatherRecord {
    const HEADER: &'static [&'static str] =
        &["Circuit", "Date", "TempMax", "TempMin", "Precipitation", "Condition"];

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.circuit.clone(),
            self.date.clone(),
            opt_number(self.temp_max),
            opt_number(self.temp_min),
            opt_number(self.precipitation),
            self.condition.clone(),
        ]
    }
}

/// Serialize records as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns [`crate::Error::Json`] if serialization fails.
pub fn to_json_string<T: Serialize>(records: &[T]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Write records as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_json<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

/// Serialize records as CSV with a header row.
///
/// # Errors
///
/// Returns an error if a record cannot be written.
pub fn write_csv_to<W: Write, T: CsvRecord>(writer: W, records: &[T]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(T::HEADER)?;
    for record in records {
        csv.write_record(record.csv_row())?;
    }
    csv.flush()?;
    Ok(())
}

/// Write records as a CSV file with a header row.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_csv<T: CsvRecord>(path: &Path, records: &[T]) -> Result<()> {
    write_csv_to(BufWriter::new(File::create(path)?), records)
}

/// Write records in the requested format.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_records<T: Serialize + CsvRecord>(
    path: &Path,
    records: &[T],
    format: Format,
) -> Result<()> {
    match format {
        Format::Json => write_json(path, records),
        Format::Csv => write_csv(path, records),
    }
}

/// Read records back from a JSON array written by [`write_json`].
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is not a JSON array of `T`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Write the run log, one line per entry.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_log(path: &Path, log: &RunLog) -> Result<()> {
    std::fs::write(path, log.to_text())?;
    Ok(())
}
