//! Daily weather from the historical weather archive API.
//!
//! The archive answers with column-oriented data: a `daily` object holding
//! one array per variable, all indexed like the `time` array.

use serde::Deserialize;
use url::Url;

use crate::result::{CircuitCoordinate, WeatherRecord};
use crate::Result;

/// Daily variables requested from the archive.
pub const DAILY_VARIABLES: &str =
    "temperature_2m_max,temperature_2m_min,precipitation_sum,weathercode";

/// Archive response; only the `daily` block is used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherResponse {
    #[serde(default)]
    pub daily: Option<DailySeries>,
}

/// Per-day columns. Values may be `null` when the archive has no data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailySeries {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    pub weathercode: Vec<Option<i64>>,
}

/// Human-readable condition for a WMO weather code.
#[must_use]
pub fn condition_for_code(code: Option<i64>) -> &'static str {
    match code {
        Some(0) => "sunny",
        Some(1) => "mostly sunny",
        Some(2) => "cloudy",
        Some(3) => "overcast",
        Some(45) => "fog",
        Some(48) => "rime fog",
        Some(51) => "light rain",
        Some(53) => "moderate rain",
        Some(55) => "heavy rain",
        Some(61) => "light showers",
        Some(63) => "moderate showers",
        Some(65) => "heavy showers",
        Some(71) => "light snow",
        Some(73) => "moderate snow",
        Some(75) => "heavy snow",
        Some(95) => "thunderstorm",
        _ => "unknown",
    }
}

/// Archive URL for a single day at one position.
///
/// # Errors
///
/// Returns [`crate::Error::MissingElement`] if `base` is not a valid URL.
pub fn archive_url(base: &str, coordinate: CircuitCoordinate, date: &str) -> Result<Url> {
    let latitude = coordinate.latitude.to_string();
    let longitude = coordinate.longitude.to_string();
    Url::parse_with_params(
        base,
        [
            ("latitude", latitude.as_str()),
            ("longitude", longitude.as_str()),
            ("start_date", date),
            ("end_date", date),
            ("daily", DAILY_VARIABLES),
            ("timezone", "auto"),
        ],
    )
    .map_err(|e| crate::Error::MissingElement(format!("invalid weather API URL {base}: {e}")))
}

/// Parse an archive response body.
///
/// # Errors
///
/// Returns [`crate::Error::Json`] for malformed bodies.
pub fn parse_response(body: &str) -> Result<WeatherResponse> {
    Ok(serde_json::from_str(body)?)
}

/// Join a response against a race day.
///
/// Returns `None` if the response has no daily block or no entry for `date`.
#[must_use]
pub fn weather_for_day(
    response: &WeatherResponse,
    circuit: &str,
    date: &str,
) -> Option<WeatherRecord> {
    let daily = response.daily.as_ref()?;
    let index = daily.time.iter().position(|day| day == date)?;

    Some(WeatherRecord {
        circuit: circuit.to_string(),
        date: date.to_string(),
        temp_max: daily.temperature_2m_max.get(index).copied().flatten(),
        temp_min: daily.temperature_2m_min.get(index).copied().flatten(),
        precipitation: daily.precipitation_sum.get(index).copied().flatten(),
        condition: condition_for_code(daily.weathercode.get(index).copied().flatten()).to_string(),
    })
}
