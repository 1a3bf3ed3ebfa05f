//! Race-day weather for calendar races.

use tracing::{debug, info};
use url::Url;

use super::fetch_page_text;
use crate::collector::Harvest;
use crate::date::normalize_date;
use crate::fetch::Fetcher;
use crate::options::Options;
use crate::result::{CalendarRace, WeatherRecord};
use crate::weather::{archive_url, parse_response, weather_for_day};
use crate::{Error, Result};

/// Look up the archive weather for every race, in input order.
///
/// Races with an unrecognized date or without both coordinates are logged
/// and skipped, as are failed or empty archive answers.
///
/// # Errors
///
/// Returns an error only if the configured archive URL is invalid.
pub fn scrape_weather<F: Fetcher + ?Sized>(
    fetcher: &F,
    races: &[CalendarRace],
    options: &Options,
) -> Result<Harvest<WeatherRecord>> {
    Url::parse(&options.weather_api_url).map_err(|e| {
        Error::MissingElement(format!("invalid weather API URL {}: {e}", options.weather_api_url))
    })?;

    let mut harvest = Harvest::new();
    for race in races {
        if let Some(record) = race_weather(fetcher, race, options, &mut harvest) {
            harvest.push(record);
        }
    }

    info!(days = harvest.len(), skipped = harvest.log.len(), "weather lookup finished");
    Ok(harvest)
}

fn race_weather<F: Fetcher + ?Sized>(
    fetcher: &F,
    race: &CalendarRace,
    options: &Options,
    harvest: &mut Harvest<WeatherRecord>,
) -> Option<WeatherRecord> {
    let circuit = race.circuit.as_str();

    let Some(date) = normalize_date(&race.date) else {
        harvest.skip(Error::UnparseableDate(format!("{} ({circuit})", race.date)).to_string());
        return None;
    };

    let Some(coordinate) = race.coordinate() else {
        harvest.skip(
            Error::UnparseableCoordinate(format!(
                "{circuit}: lat={:?}, lon={:?}",
                race.latitude, race.longitude
            ))
            .to_string(),
        );
        return None;
    };

    let url = match archive_url(&options.weather_api_url, coordinate, &date) {
        Ok(url) => url,
        Err(err) => {
            harvest.skip(err.to_string());
            return None;
        }
    };

    let body = fetch_page_text(fetcher, url.as_str(), &mut harvest.log)?;
    let response = match parse_response(&body) {
        Ok(response) => response,
        Err(err) => {
            harvest.skip(format!("Unreadable weather answer for {circuit} on {date}: {err}"));
            return None;
        }
    };

    let record = weather_for_day(&response, circuit, &date);
    if record.is_none() {
        harvest.skip(format!("No weather data for {circuit} on {date}"));
    } else {
        debug!(circuit, date, "weather found");
    }
    record
}
