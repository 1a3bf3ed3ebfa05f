//! # gp-scrape
//!
//! Extraction and normalization of motorcycle Grand Prix data from
//! encyclopedia pages: race infoboxes, starting grids, season calendars with
//! circuit coordinates, and race-day weather from a historical archive.
//!
//! The extractors are pure functions over parsed documents. The drivers in
//! [`scrape`] fetch pages through a [`Fetcher`], feed them to the extractors
//! and collect records plus a log of everything skipped.
//!
//! ## Quick Start
//!
//! ```rust
//! use gp_scrape::dom::parse;
//! use gp_scrape::labeled_table::{extract_infobox, LabelSet};
//! use gp_scrape::{normalize_date, RaceEvent};
//!
//! let html = r#"<table class="infobox">
//!   <tr><th>Date</th><td>June 14, 2023</td></tr>
//!   <tr><th>Location</th><td>Mugello</td></tr>
//! </table>"#;
//!
//! let doc = parse(html);
//! let labels = LabelSet::exact(["Date", "Official name", "Location", "Course"]);
//! let event = extract_infobox(&doc, &labels).map(|data| RaceEvent::from_labels(&data));
//!
//! assert_eq!(event.and_then(|e| e.date).as_deref(), Some("2023-06-14"));
//! assert_eq!(normalize_date("1 luglio 2012").as_deref(), Some("2012-07-01"));
//! ```
//!
//! ## Features
//!
//! - **Date normalization**: English and Italian date text, ranges, ordinals
//! - **Coordinates**: decimal map attributes or degree-minute-second text
//! - **Tables**: label/value infoboxes and header-indexed results tables
//! - **Output**: JSON arrays, fixed-header CSV and a plain-text run log

mod error;
mod options;
mod patterns;
mod result;

/// DOM operations adapter over `dom_query`.
pub mod dom;

/// Free-text date normalization.
pub mod date;

/// Circuit coordinate extraction.
pub mod coords;

/// Label/value (infobox) table extraction.
pub mod labeled_table;

/// Heading-based section discovery and table chaining.
pub mod section;

/// Header-indexed results table extraction.
pub mod results_table;

/// Weather archive response model and code lookup.
pub mod weather;

/// Run accumulators: records and run log.
pub mod collector;

/// JSON, CSV and log writers.
pub mod output;

/// Character encoding detection and transcoding.
pub mod encoding;

/// URL resolution against a wiki base.
pub mod url_utils;

/// Page fetching.
pub mod fetch;

/// Scrape drivers.
pub mod scrape;

// Public API - re-exports
pub use collector::{Harvest, RunLog};
pub use date::normalize_date;
pub use error::{Error, Result};
pub use fetch::{Fetcher, HttpFetcher};
pub use options::Options;
pub use result::{
    CalendarRace, CircuitCoordinate, GridEntry, RaceClass, RaceEvent, WeatherRecord, LABEL_COURSE,
    LABEL_DATE, LABEL_LOCATION, LABEL_OFFICIAL_NAME,
};
