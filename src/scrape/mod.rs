//! Scrape drivers.
//!
//! Each driver walks one family of pages, hands every page to the pure
//! extractors and collects the records into a [`Harvest`]. A unit of work
//! that fails (a page, a row, a section) becomes one run-log line and the
//! driver moves on; only a failed starting page ends the run with `Err`.
//!
//! [`Harvest`]: crate::collector::Harvest

mod calendar;
mod events;
mod grid;
mod weather;

pub use calendar::scrape_calendar;
pub use events::scrape_events;
pub use grid::scrape_grid;
pub use weather::scrape_weather;

use dom_query::{Document, Selection};
use url::Url;

use crate::collector::RunLog;
use crate::dom;
use crate::fetch::Fetcher;
use crate::url_utils::resolve_href;

/// Fetch a body, logging the failure instead of returning it.
fn fetch_page_text<F: Fetcher + ?Sized>(
    fetcher: &F,
    url: &str,
    log: &mut RunLog,
) -> Option<String> {
    match fetcher.fetch_text(url) {
        Ok(body) => Some(body),
        Err(err) => {
            log.record(err.to_string());
            None
        }
    }
}

/// Fetch and parse a page, logging the failure instead of returning it.
fn fetch_page<F: Fetcher + ?Sized>(fetcher: &F, url: &str, log: &mut RunLog) -> Option<Document> {
    fetch_page_text(fetcher, url, log).map(|html| dom::parse(&html))
}

/// Absolute URL of a link element's `href`.
fn link_url(base: &Url, link: &Selection) -> Option<String> {
    let href = dom::get_attribute(link, "href")?;
    resolve_href(base, &href)
}

/// Absolute URL of the first link inside `cell`.
fn first_link_url(base: &Url, cell: &Selection) -> Option<String> {
    cell.select("a[href]")
        .iter()
        .find_map(|link| link_url(base, &link))
}
