//! Event infoboxes from the English list of Grands Prix.
//!
//! The list page has one row per Grand Prix with the number of races held.
//! A Grand Prix run once has its own event page; one run many times has a
//! winners-by-season section whose tables link every edition.

use dom_query::{Document, Selection};
use tracing::{debug, info};
use url::Url;

use super::{fetch_page, first_link_url, link_url};
use crate::collector::{Harvest, RunLog};
use crate::dom;
use crate::fetch::Fetcher;
use crate::labeled_table::{extract_labeled_table, find_infobox, LabelSet};
use crate::options::Options;
use crate::result::RaceEvent;
use crate::section::{find_first_by_ids, tables_until};
use crate::url_utils::parse_base;
use crate::{Error, Result};

/// Class pair marking the list table.
const LIST_TABLE_CLASSES: &[&str] = &["wikitable", "sortable"];

/// Scrape event infoboxes reachable from the list page.
///
/// # Errors
///
/// Returns an error if the list page cannot be fetched or has no list table.
pub fn scrape_events<F: Fetcher + ?Sized>(
    fetcher: &F,
    options: &Options,
) -> Result<Harvest<RaceEvent>> {
    let base = parse_base(&options.wiki_base_en)?;
    let html = fetcher.fetch_text(&options.list_url)?;
    let doc = dom::parse(&html);

    let table = dom::find_all_by_classes(&doc, "table", LIST_TABLE_CLASSES)
        .into_iter()
        .next()
        .ok_or_else(|| {
            Error::MissingElement(format!("no sortable wikitable on {}", options.list_url))
        })?;

    let walker = EventWalker {
        fetcher,
        base: &base,
        labels: options.event_label_set(),
        options,
    };

    let mut harvest = Harvest::new();
    for row in dom::table_rows(&table).iter().skip(1).take(options.event_limit) {
        walker.list_row(row, &mut harvest);
    }

    info!(events = harvest.len(), skipped = harvest.log.len(), "event scrape finished");
    Ok(harvest)
}

struct EventWalker<'a, F: ?Sized> {
    fetcher: &'a F,
    base: &'a Url,
    labels: LabelSet,
    options: &'a Options,
}

impl<F: Fetcher + ?Sized> EventWalker<'_, F> {
    fn list_row(&self, row: &Selection, harvest: &mut Harvest<RaceEvent>) {
        let cells = dom::data_cells(row);
        if cells.len() < 3 {
            harvest.skip(format!("Row skipped: {} cells, need 3", cells.len()));
            return;
        }

        // The first cell links the country flag first and the Grand Prix second.
        let links: Vec<Selection> = cells[0].select("a[href]").iter().collect();
        let race_link = if links.len() > 1 { links.get(1) } else { links.first() };
        let Some(race_url) = race_link.and_then(|link| link_url(self.base, link)) else {
            harvest.skip(format!("No usable link in row {}", dom::trimmed_text(&cells[0])));
            return;
        };

        let count_text = dom::trimmed_text(&cells[2]);
        let Ok(count) = count_text.parse::<u32>() else {
            harvest.skip(format!("Unreadable race count {count_text:?} for {race_url}"));
            return;
        };

        if count == 1 {
            if let Some(event) = self.event_page(&race_url, &mut harvest.log) {
                harvest.push(event);
            }
        } else {
            self.winners_page(&race_url, harvest);
        }
    }

    /// One event record from the infobox of `url`.
    fn event_page(&self, url: &str, log: &mut RunLog) -> Option<RaceEvent> {
        let doc = fetch_page(self.fetcher, url, log)?;
        event_from_document(&doc, url, &self.labels, log)
    }

    /// Every edition linked from the winners tables of `url`.
    fn winners_page(&self, url: &str, harvest: &mut Harvest<RaceEvent>) {
        let Some(doc) = fetch_page(self.fetcher, url, &mut harvest.log) else {
            return;
        };
        let Some(heading) = find_first_by_ids(&doc, &self.options.winners_heading_ids) else {
            harvest.skip(format!("No winners section in {url}"));
            return;
        };

        let mut editions = 0usize;
        for table in tables_until(&heading, &self.options.terminating_heading) {
            for row in dom::table_rows(&table).iter().skip(1) {
                let cells = dom::data_cells(row);
                let Some(last) = cells.last() else {
                    continue;
                };
                let Some(edition_url) = first_link_url(self.base, last) else {
                    continue;
                };
                editions += 1;
                if let Some(event) = self.event_page(&edition_url, &mut harvest.log) {
                    harvest.push(event);
                }
            }
        }

        debug!(url, editions, "winners tables walked");
    }
}

/// Event record from a parsed event page.
///
/// A page without an infobox is logged; an infobox without any wanted
/// label yields nothing.
pub(crate) fn event_from_document(
    doc: &Document,
    url: &str,
    labels: &LabelSet,
    log: &mut RunLog,
) -> Option<RaceEvent> {
    let Some(infobox) = find_infobox(doc) else {
        log.record(format!("No infobox in {url}"));
        return None;
    };
    extract_labeled_table(&infobox, labels).map(|data| RaceEvent::from_labels(&data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::testing::CannedPages;

    const LIST_URL: &str = "https://en.wikipedia.org/wiki/List_of_Grand_Prix_motorcycle_races";

    const LIST: &str = r#"<html><body>
        <table class="wikitable sortable">
          <tr><th>Race</th><th>Years</th><th>Races</th></tr>
          <tr><td><a href="/wiki/Flag_of_Qatar">QA</a> <a href="/wiki/Qatar_motorcycle_Grand_Prix">Qatar</a></td><td>2004-</td><td>1</td></tr>
          <tr><td><a href="/wiki/Dutch_TT">Dutch TT</a></td><td>1949-</td><td>3</td></tr>
          <tr><td><a href="/wiki/Nowhere_Grand_Prix">Nowhere</a></td><td>1990</td><td>n/a</td></tr>
          <tr><td>Too short</td></tr>
        </table></body></html>"#;

    const QATAR: &str = r#"<table class="infobox">
        <tr><th>Official name</th><td>Grand Prix of Qatar</td></tr>
        <tr><th>Date</th><td>March 8, 2015</td></tr>
        <tr><th>Location</th><td>Losail International Circuit</td></tr>
        <tr><th>Pole</th><td>Jorge Lorenzo</td></tr>
    </table>"#;

    const DUTCH: &str = r#"<html><body>
        <div class="mw-heading mw-heading2"><h2 id="Winners_by_season">Winners by season</h2></div>
        <table class="wikitable">
          <tr><th>Year</th><th>Report</th></tr>
          <tr><td>2015</td><td><a href="/wiki/2015_Dutch_TT">Report</a></td></tr>
        </table>
        <p>Earlier years</p>
        <table class="wikitable">
          <tr><th>Year</th><th>Report</th></tr>
          <tr><td>2014</td><td><a href="/wiki/2014_Dutch_TT">Report</a></td></tr>
        </table>
        <div class="mw-heading mw-heading2"><h2 id="References">References</h2></div>
        <table class="wikitable"><tr><th>x</th></tr><tr><td><a href="/wiki/Unrelated">u</a></td></tr></table>
    </body></html>"#;

    fn tt(date: &str) -> String {
        format!(
            r#"<table class="infobox"><tr><th>Date</th><td>{date}</td></tr><tr><th>Course</th><td>4.542 km</td></tr></table>"#
        )
    }

    #[test]
    fn single_and_multiple_events() {
        let pages = CannedPages::default()
            .with(LIST_URL, LIST)
            .with("https://en.wikipedia.org/wiki/Qatar_motorcycle_Grand_Prix", QATAR)
            .with("https://en.wikipedia.org/wiki/Dutch_TT", DUTCH)
            .with("https://en.wikipedia.org/wiki/2015_Dutch_TT", &tt("27 June 2015"))
            .with("https://en.wikipedia.org/wiki/2014_Dutch_TT", &tt("28 June 2014"));

        let harvest = match scrape_events(&pages, &Options::default()) {
            Ok(harvest) => harvest,
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        };

        let dates: Vec<_> = harvest.records.iter().map(|e| e.date.clone()).collect();
        assert_eq!(
            dates,
            vec![
                Some("2015-03-08".to_string()),
                Some("2015-06-27".to_string()),
                Some("2014-06-28".to_string()),
            ]
        );
        assert_eq!(harvest.records[0].official_name.as_deref(), Some("Grand Prix of Qatar"));
        assert_eq!(harvest.records[1].course.as_deref(), Some("4.542 km"));

        let log = harvest.log.to_text();
        assert!(log.contains("Unreadable race count \"n/a\""));
        assert!(log.contains("Row skipped: 1 cells, need 3"));
        assert!(!log.contains("Unrelated"));
    }

    #[test]
    fn limit_caps_list_rows() {
        let pages = CannedPages::default()
            .with(LIST_URL, LIST)
            .with("https://en.wikipedia.org/wiki/Qatar_motorcycle_Grand_Prix", QATAR);
        let options = Options {
            event_limit: 1,
            ..Options::default()
        };

        let harvest = scrape_events(&pages, &options).unwrap_or_default();
        assert_eq!(harvest.len(), 1);
        assert!(harvest.log.is_empty());
    }

    #[test]
    fn missing_pages_are_logged_not_fatal() {
        let pages = CannedPages::default().with(LIST_URL, LIST);
        let harvest = scrape_events(&pages, &Options::default()).unwrap_or_default();

        assert!(harvest.is_empty());
        assert!(harvest
            .log
            .entries()
            .iter()
            .any(|line| line
                == "Unexpected status 404 for https://en.wikipedia.org/wiki/Dutch_TT"));
    }

    #[test]
    fn winners_section_absent_is_logged() {
        let pages = CannedPages::default()
            .with(LIST_URL, LIST)
            .with("https://en.wikipedia.org/wiki/Dutch_TT", "<h2 id=\"History\">History</h2>");
        let harvest = scrape_events(&pages, &Options::default()).unwrap_or_default();
        assert!(harvest
            .log
            .to_text()
            .contains("No winners section in https://en.wikipedia.org/wiki/Dutch_TT"));
    }

    #[test]
    fn unreachable_list_page_is_an_error() {
        let pages = CannedPages::default();
        assert!(matches!(
            scrape_events(&pages, &Options::default()),
            Err(Error::HttpStatus { status: 404, .. })
        ));
    }

    #[test]
    fn page_without_infobox_is_logged() {
        let doc = dom::parse("<p>No box</p>");
        let mut log = RunLog::default();
        let labels = Options::default().event_label_set();
        assert!(event_from_document(&doc, "https://x.org/a", &labels, &mut log).is_none());
        assert_eq!(log.to_text(), "No infobox in https://x.org/a");
    }
}
