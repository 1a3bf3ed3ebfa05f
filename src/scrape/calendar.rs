//! Season calendars with circuit positions and race details.
//!
//! Every season page opens with a calendar table. Each row names the race
//! day without a year, links the circuit page (for coordinates) and, in its
//! last cell, the race's detail page (for the official name, course and
//! whether it ran at night).

use dom_query::Selection;
use tracing::{debug, info};
use url::Url;

use super::{fetch_page, first_link_url};
use crate::collector::Harvest;
use crate::coords::find_coordinates;
use crate::date::season_date;
use crate::dom;
use crate::fetch::Fetcher;
use crate::labeled_table::{find_infobox, labeled_rows, LabelSet};
use crate::options::Options;
use crate::result::CalendarRace;
use crate::section::WIKITABLE_CLASS;
use crate::url_utils::{parse_base, season_url};
use crate::{Error, Result};

/// Data cells a calendar row needs.
const MIN_CALENDAR_CELLS: usize = 5;

/// Scrape the calendar of every season in `options.years()`.
///
/// # Errors
///
/// Returns an error only if the configured wiki base URL is invalid.
pub fn scrape_calendar<F: Fetcher + ?Sized>(
    fetcher: &F,
    options: &Options,
) -> Result<Harvest<CalendarRace>> {
    let base = parse_base(&options.wiki_base_it)?;
    let walker = CalendarWalker {
        fetcher,
        base: &base,
        options,
        labels: options.calendar_label_set(),
    };

    let mut harvest = Harvest::new();
    for year in options.years() {
        walker.season(year, &mut harvest);
    }

    info!(races = harvest.len(), skipped = harvest.log.len(), "calendar scrape finished");
    Ok(harvest)
}

struct CalendarWalker<'a, F: ?Sized> {
    fetcher: &'a F,
    base: &'a Url,
    options: &'a Options,
    labels: LabelSet,
}

impl<F: Fetcher + ?Sized> CalendarWalker<'_, F> {
    fn season(&self, year: i32, harvest: &mut Harvest<CalendarRace>) {
        let Some(url) = season_url(self.base, &self.options.season_path, year) else {
            harvest.skip(format!("No season page URL for {year}"));
            return;
        };
        let Some(doc) = fetch_page(self.fetcher, &url, &mut harvest.log) else {
            return;
        };
        let Some(table) = dom::find_by_class(&doc, "table", WIKITABLE_CLASS) else {
            harvest.skip(format!("No calendar table for {year}"));
            return;
        };

        for row in dom::table_rows(&table).iter().skip(1) {
            if let Some(race) = self.calendar_row(year, row, harvest) {
                harvest.push(race);
            }
        }
    }

    fn calendar_row(
        &self,
        year: i32,
        row: &Selection,
        harvest: &mut Harvest<CalendarRace>,
    ) -> Option<CalendarRace> {
        let cells = dom::data_cells(row);
        if cells.len() < MIN_CALENDAR_CELLS {
            let reason =
                format!("{} cells in {year} calendar, need {MIN_CALENDAR_CELLS}", cells.len());
            harvest.skip(Error::MalformedRow(reason).to_string());
            return None;
        }

        let raw_date = dom::trimmed_text(&cells[0]);
        let Some(date) = season_date(year, &raw_date) else {
            harvest.skip(format!("{} in {year} calendar", Error::UnparseableDate(raw_date)));
            return None;
        };

        let circuit = dom::trimmed_text(&cells[2]);
        let Some(circuit_url) = first_link_url(self.base, &cells[2]) else {
            harvest.skip(format!("No link for circuit '{circuit}'"));
            return None;
        };
        let Some(detail_url) = first_link_url(self.base, &cells[cells.len() - 1]) else {
            let element = format!("race detail link for '{circuit}' ({date})");
            harvest.skip(Error::MissingElement(element).to_string());
            return None;
        };

        let circuit_page = fetch_page(self.fetcher, &circuit_url, &mut harvest.log)?;
        let coordinate = find_coordinates(&circuit_page);
        if coordinate.is_none() {
            debug!(circuit, "no coordinates on circuit page");
        }

        let detail_page = fetch_page(self.fetcher, &detail_url, &mut harvest.log)?;
        let rows = find_infobox(&detail_page)
            .map(|table| labeled_rows(&table, &self.labels))
            .unwrap_or_default();

        Some(CalendarRace {
            year,
            date,
            circuit,
            official_name: detail(&rows, &self.options.calendar_name_label),
            course: detail(&rows, &self.options.calendar_course_label),
            night_race: self.is_night_race(&rows),
            latitude: coordinate.map(|c| c.latitude),
            longitude: coordinate.map(|c| c.longitude),
        })
    }

    /// Whether any note row mentions the night marker.
    fn is_night_race(&self, rows: &[(String, String)]) -> bool {
        let note = self.options.calendar_note_label.to_lowercase();
        let marker = self.options.night_marker.to_lowercase();
        rows.iter()
            .any(|(key, value)| *key == note && value.to_lowercase().contains(&marker))
    }
}

/// Last infobox value under a substring label; allow-list keys are lower-cased.
fn detail(rows: &[(String, String)], label: &str) -> String {
    let label = label.to_lowercase();
    rows.iter()
        .rev()
        .find(|(key, _)| *key == label)
        .map(|(_, value)| value.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::testing::CannedPages;

    const SEASON: &str = r#"<html><body>
        <table class="wikitable">
          <tr><th>Data</th><th>GP</th><th>Circuito</th><th>Vincitore</th><th>Dettagli</th></tr>
          <tr><td>8º marzo</td><td>Qatar</td><td><a href="/wiki/Circuito_di_Losail">Losail</a></td><td>Rossi</td><td><a href="/wiki/GP_del_Qatar_2015">Qatar</a></td></tr>
          <tr><td>19-21 aprile</td><td>Americhe</td><td>Austin</td><td>Márquez</td><td><a href="/wiki/GP_delle_Americhe_2015">USA</a></td></tr>
          <tr><td>da definire</td><td>?</td><td><a href="/wiki/X">X</a></td><td>-</td><td>-</td></tr>
          <tr><td>31 maggio</td><td>Italia</td><td><a href="/wiki/Autodromo_del_Mugello">Mugello</a></td><td>Lorenzo</td><td><a href="/wiki/GP_d%27Italia_2015">Italia</a></td></tr>
        </table></body></html>"#;

    const LOSAIL: &str =
        r#"<span id="coordinates"><a class="mw-kartographer-maplink" data-lat="25.49" data-lon="51.45">25°29′N 51°27′E</a></span>"#;

    const QATAR: &str = r#"<table class="infobox">
        <tr><th>Nome ufficiale</th><td>Commercial Bank Grand Prix of Qatar</td></tr>
        <tr><th>Percorso</th><td>5,380 km</td></tr>
        <tr><th>Note</th><td>Gara in notturna</td></tr>
    </table>"#;

    const MUGELLO: &str = r#"<span id="coordinates">43°59′51″N 11°22′16″E</span>"#;

    fn options() -> Options {
        Options {
            start_year: 2015,
            end_year: 2015,
            ..Options::default()
        }
    }

    #[test]
    fn calendar_rows_to_races() {
        let pages = CannedPages::default()
            .with("https://it.wikipedia.org/wiki/Motomondiale_2015", SEASON)
            .with("https://it.wikipedia.org/wiki/Circuito_di_Losail", LOSAIL)
            .with("https://it.wikipedia.org/wiki/GP_del_Qatar_2015", QATAR)
            .with("https://it.wikipedia.org/wiki/Autodromo_del_Mugello", MUGELLO)
            .with("https://it.wikipedia.org/wiki/GP_d%27Italia_2015", "<p>senza infobox</p>");

        let harvest = match scrape_calendar(&pages, &options()) {
            Ok(harvest) => harvest,
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        };

        assert_eq!(harvest.len(), 2);
        let qatar = &harvest.records[0];
        assert_eq!(qatar.date, "2015-03-08");
        assert_eq!(qatar.circuit, "Losail");
        assert_eq!(qatar.official_name, "Commercial Bank Grand Prix of Qatar");
        assert_eq!(qatar.course, "5,380 km");
        assert!(qatar.night_race);
        assert_eq!(qatar.latitude, Some(25.49));
        assert_eq!(qatar.longitude, Some(51.45));

        let mugello = &harvest.records[1];
        assert_eq!(mugello.date, "2015-05-31");
        assert!(!mugello.night_race);
        assert!(mugello.official_name.is_empty());
        assert!(mugello.latitude.is_some_and(|lat| (lat - 43.9975).abs() < 1e-6));

        assert_eq!(
            harvest.log.entries(),
            [
                "No link for circuit 'Austin'".to_string(),
                "Unrecognized date: \"da definire\" in 2015 calendar".to_string(),
            ]
        );
    }

    #[test]
    fn dropped_rows_are_logged() {
        let season = r#"<table class="wikitable">
            <tr><th>Data</th><th>GP</th><th>Circuito</th><th>Vincitore</th><th>Dettagli</th></tr>
            <tr><td>da definire</td><td>?</td><td><a href="/wiki/X">X</a></td><td>-</td><td>-</td></tr>
            <tr><td>8 marzo</td><td>Qatar</td><td><a href="/wiki/Circuito_di_Losail">Losail</a></td><td>Rossi</td><td>Qatar</td></tr>
            <tr><td>cancellato</td><td>Argentina</td></tr>
        </table>"#;
        let pages = CannedPages::default()
            .with("https://it.wikipedia.org/wiki/Motomondiale_2015", season)
            .with("https://it.wikipedia.org/wiki/Circuito_di_Losail", LOSAIL);

        let harvest = scrape_calendar(&pages, &options()).unwrap_or_default();

        assert!(harvest.is_empty());
        assert_eq!(
            harvest.log.entries(),
            [
                "Unrecognized date: \"da definire\" in 2015 calendar".to_string(),
                "Missing element: race detail link for 'Losail' (2015-03-08)".to_string(),
                "Malformed row: 2 cells in 2015 calendar, need 5".to_string(),
            ]
        );
    }

    #[test]
    fn any_note_row_marks_a_night_race() {
        let season = r#"<table class="wikitable">
            <tr><th>Data</th><th>GP</th><th>Circuito</th><th>Vincitore</th><th>Dettagli</th></tr>
            <tr><td>8 marzo</td><td>Qatar</td><td><a href="/wiki/Circuito_di_Losail">Losail</a></td><td>Rossi</td><td><a href="/wiki/GP_del_Qatar_2015">Qatar</a></td></tr>
        </table>"#;
        let detail = r#"<table class="infobox">
            <tr><th>Percorso</th><td>5,380 km</td></tr>
            <tr><th>Note</th><td>Gara in notturna</td></tr>
            <tr><th>Note</th><td>Prima gara della stagione</td></tr>
        </table>"#;
        let pages = CannedPages::default()
            .with("https://it.wikipedia.org/wiki/Motomondiale_2015", season)
            .with("https://it.wikipedia.org/wiki/Circuito_di_Losail", LOSAIL)
            .with("https://it.wikipedia.org/wiki/GP_del_Qatar_2015", detail);

        let harvest = scrape_calendar(&pages, &options()).unwrap_or_default();

        assert_eq!(harvest.len(), 1);
        assert!(harvest.records[0].night_race);
        assert_eq!(harvest.records[0].course, "5,380 km");
    }

    #[test]
    fn missing_table_is_logged() {
        let pages = CannedPages::default()
            .with("https://it.wikipedia.org/wiki/Motomondiale_2015", "<p>vuota</p>");
        let harvest = scrape_calendar(&pages, &options()).unwrap_or_default();
        assert!(harvest.is_empty());
        assert_eq!(harvest.log.to_text(), "No calendar table for 2015");
    }
}
