//! Configuration options for scrape runs.
//!
//! The `Options` struct names every page, heading, label and column the
//! drivers look for, so a run can be pointed at differently laid out pages
//! without code changes.

use std::ops::RangeInclusive;
use std::time::Duration;

use chrono::{Datelike, Utc};

use crate::labeled_table::LabelSet;
use crate::result::{LABEL_COURSE, LABEL_DATE, LABEL_LOCATION, LABEL_OFFICIAL_NAME};
use crate::results_table::{ColumnSpec, FlagMarkers};

/// Configuration options for scrape runs.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use gp_scrape::Options;
///
/// let options = Options {
///     start_year: 2020,
///     end_year: 2021,
///     ..Options::default()
/// };
/// assert_eq!(options.years().count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Base URL of the English encyclopedia.
    ///
    /// Default: `"https://en.wikipedia.org"`
    pub wiki_base_en: String,

    /// Page listing every Grand Prix with its race count.
    ///
    /// Default: `"https://en.wikipedia.org/wiki/List_of_Grand_Prix_motorcycle_races"`
    pub list_url: String,

    /// Base URL of the Italian encyclopedia.
    ///
    /// Default: `"https://it.wikipedia.org"`
    pub wiki_base_it: String,

    /// Season page path; `{year}` is replaced by the season.
    ///
    /// Default: `"/wiki/Motomondiale_{year}"`
    pub season_path: String,

    /// First season scraped by the grid and calendar drivers.
    ///
    /// Default: `2005`
    pub start_year: i32,

    /// Last season scraped (inclusive).
    ///
    /// Default: the current year
    pub end_year: i32,

    /// Number of list-page rows the event driver processes.
    ///
    /// Default: `55`
    pub event_limit: usize,

    /// Minimum pause between two requests.
    ///
    /// Default: 1 second
    pub request_delay: Duration,

    /// Per-request timeout.
    ///
    /// Default: 30 seconds
    pub request_timeout: Duration,

    /// `User-Agent` header sent with every request.
    ///
    /// Default: `"Mozilla/5.0"`
    pub user_agent: String,

    /// Heading ids that may open a winners-by-season section, tried in order.
    pub winners_heading_ids: Vec<String>,

    /// Text of the `h2` that ends the winners tables.
    ///
    /// Default: `"References"`
    pub terminating_heading: String,

    /// Infobox labels kept for event pages (exact match).
    ///
    /// Default: `Date`, `Official name`, `Location`, `Course`
    pub event_labels: Vec<String>,

    /// Detail-page label holding the official name (substring match).
    ///
    /// Default: `"nome ufficiale"`
    pub calendar_name_label: String,

    /// Detail-page label holding the course (substring match).
    ///
    /// Default: `"percorso"`
    pub calendar_course_label: String,

    /// Detail-page label holding free-form notes (substring match).
    ///
    /// Default: `"note"`
    pub calendar_note_label: String,

    /// Word in the notes marking a night race.
    ///
    /// Default: `"notturna"`
    pub night_marker: String,

    /// Report-page sections to read, as (heading id, class label) pairs.
    ///
    /// Default: `[("MotoGP", "MotoGP")]`
    pub class_sections: Vec<(String, String)>,

    /// Sub-sections of each class section holding results tables.
    ///
    /// Default: `"arrivati al traguardo"`, `"ritirati"`
    pub subsections: Vec<String>,

    /// Accepted header names of the rider column.
    ///
    /// Default: `"pilota"`, `"rider"`
    pub rider_columns: Vec<String>,

    /// Accepted header names of the position column.
    ///
    /// Default: `"griglia"`, `"grid"`
    pub position_columns: Vec<String>,

    /// Link titles containing any of these are flags, not riders.
    ///
    /// Default: `"bandiera"`, `"flag"`
    pub flag_markers: Vec<String>,

    /// Text of the season-table link leading to a race report.
    ///
    /// Default: `"resoconto"`
    pub report_link_text: String,

    /// Historical weather archive endpoint.
    ///
    /// Default: `"https://archive-api.open-meteo.com/v1/archive"`
    pub weather_api_url: String,
}

impl Options {
    /// Seasons to scrape, `start_year..=end_year`.
    #[must_use]
    pub fn years(&self) -> RangeInclusive<i32> {
        self.start_year..=self.end_year
    }

    /// Label allow-list for event-page infoboxes.
    #[must_use]
    pub fn event_label_set(&self) -> LabelSet {
        LabelSet::exact(self.event_labels.iter().cloned())
    }

    /// Label allow-list for calendar detail-page infoboxes.
    #[must_use]
    pub fn calendar_label_set(&self) -> LabelSet {
        LabelSet::containing([
            self.calendar_name_label.clone(),
            self.calendar_course_label.clone(),
            self.calendar_note_label.clone(),
        ])
    }

    #[must_use]
    pub fn column_spec(&self) -> ColumnSpec {
        ColumnSpec::new(self.rider_columns.iter().cloned(), self.position_columns.iter().cloned())
    }

    #[must_use]
    pub fn flag_filter(&self) -> FlagMarkers {
        FlagMarkers::new(self.flag_markers.iter().cloned())
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

impl Default for Options {
    fn default() -> Self {
        Self {
            wiki_base_en: "https://en.wikipedia.org".to_string(),
            list_url: "https://en.wikipedia.org/wiki/List_of_Grand_Prix_motorcycle_races"
                .to_string(),
            wiki_base_it: "https://it.wikipedia.org".to_string(),
            season_path: "/wiki/Motomondiale_{year}".to_string(),
            start_year: 2005,
            end_year: Utc::now().year(),
            event_limit: 55,
            request_delay: Duration::from_millis(1000),
            request_timeout: Duration::from_secs(30),
            user_agent: "Mozilla/5.0".to_string(),
            winners_heading_ids: strings(&[
                "By_year",
                "Winners_by_season",
                "Winners_of_the_Italian_motorcycle_Grand_Prix",
                "Winners_of_the_Czech_Republic_motorcycle_Grand_Prix",
                "Grand_Prix_motorcycle_racing_winners",
            ]),
            terminating_heading: "References".to_string(),
            event_labels: strings(&[LABEL_DATE, LABEL_OFFICIAL_NAME, LABEL_LOCATION, LABEL_COURSE]),
            calendar_name_label: "nome ufficiale".to_string(),
            calendar_course_label: "percorso".to_string(),
            calendar_note_label: "note".to_string(),
            night_marker: "notturna".to_string(),
            class_sections: vec![("MotoGP".to_string(), "MotoGP".to_string())],
            subsections: strings(&["arrivati al traguardo", "ritirati"]),
            rider_columns: strings(&["pilota", "rider"]),
            position_columns: strings(&["griglia", "grid"]),
            flag_markers: strings(&["bandiera", "flag"]),
            report_link_text: "resoconto".to_string(),
            weather_api_url: "https://archive-api.open-meteo.com/v1/archive".to_string(),
        }
    }
}
