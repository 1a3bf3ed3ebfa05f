//! Record types produced by the extractors.
//!
//! Field names on the wire (JSON keys, CSV headers) are fixed by the
//! `serde` renames below and do not follow Rust naming.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::date::normalize_date;

/// Infobox label holding the race date.
pub const LABEL_DATE: &str = "Date";
/// Infobox label holding the official race name.
pub const LABEL_OFFICIAL_NAME: &str = "Official name";
/// Infobox label holding the location.
pub const LABEL_LOCATION: &str = "Location";
/// Infobox label holding the course description.
pub const LABEL_COURSE: &str = "Course";

/// One race, read from the infobox of its event page.
///
/// Absent labels stay absent in the JSON output rather than becoming `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceEvent {
    #[serde(rename = "Official name", skip_serializing_if = "Option::is_none", default)]
    pub official_name: Option<String>,

    /// ISO date when the infobox text could be normalized, raw text otherwise.
    #[serde(rename = "Date", skip_serializing_if = "Option::is_none", default)]
    pub date: Option<String>,

    #[serde(rename = "Location", skip_serializing_if = "Option::is_none", default)]
    pub location: Option<String>,

    #[serde(rename = "Course", skip_serializing_if = "Option::is_none", default)]
    pub course: Option<String>,
}

impl RaceEvent {
    /// Build an event from an infobox label map.
    #[must_use]
    pub fn from_labels(labels: &BTreeMap<String, String>) -> Self {
        let date = labels
            .get(LABEL_DATE)
            .map(|raw| normalize_date(raw).unwrap_or_else(|| raw.clone()));

        Self {
            official_name: labels.get(LABEL_OFFICIAL_NAME).cloned(),
            date,
            location: labels.get(LABEL_LOCATION).cloned(),
            course: labels.get(LABEL_COURSE).cloned(),
        }
    }
}

/// One rider's grid position in one session of one event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridEntry {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Circuit")]
    pub circuit: String,
    #[serde(rename = "OfficialName")]
    pub official_name: String,
    #[serde(rename = "Class")]
    pub class: String,
    #[serde(rename = "RiderName")]
    pub rider_name: String,
    /// Cell text as written; may be non-numeric ("Ritirato").
    #[serde(rename = "Position")]
    pub position: String,
}

/// One race from a season calendar, with circuit position and detail-page data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarRace {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Circuit")]
    pub circuit: String,
    #[serde(rename = "OfficialName", default)]
    pub official_name: String,
    #[serde(rename = "Course", default)]
    pub course: String,
    #[serde(rename = "NightRace", default)]
    pub night_race: bool,
    #[serde(rename = "Latitude", default)]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude", default)]
    pub longitude: Option<f64>,
}

impl CalendarRace {
    /// Circuit position when both coordinates are known.
    #[must_use]
    pub fn coordinate(&self) -> Option<CircuitCoordinate> {
        Some(CircuitCoordinate {
            latitude: self.latitude?,
            longitude: self.longitude?,
        })
    }
}

/// Daily weather at a circuit on race day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    #[serde(rename = "Circuit")]
    pub circuit: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "TempMax")]
    pub temp_max: Option<f64>,
    #[serde(rename = "TempMin")]
    pub temp_min: Option<f64>,
    #[serde(rename = "Precipitation")]
    pub precipitation: Option<f64>,
    #[serde(rename = "Condition")]
    pub condition: String,
}

/// Decimal degrees; negative south of the equator and west of Greenwich.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircuitCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Championship class a results section belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RaceClass {
    MotoGP,
    Moto2,
    Moto3,
}

impl RaceClass {
    /// Classify a section or page title, including the pre-2010 names of
    /// the intermediate and lightweight classes.
    #[must_use]
    pub fn from_title(title: &str) -> Option<Self> {
        let title = title.to_lowercase();
        if title.contains("motogp") {
            Some(Self::MotoGP)
        } else if title.contains("moto2") || title.contains("classe 250") {
            Some(Self::Moto2)
        } else if title.contains("moto3") || title.contains("classe 125") {
            Some(Self::Moto3)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MotoGP => "MotoGP",
            Self::Moto2 => "Moto2",
            Self::Moto3 => "Moto3",
        }
    }
}

impl fmt::Display for RaceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
