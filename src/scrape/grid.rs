//! Starting grid positions from Italian season and race-report pages.
//!
//! A season page lists every Grand Prix of the year with a link to its race
//! report. The report has one section per class, each split into finishers
//! and retirements, and every one of those tables has a grid column.

use dom_query::{Document, Selection};
use tracing::{debug, info};
use url::Url;

use super::fetch_page;
use crate::collector::{Harvest, RunLog};
use crate::date::{normalize_date, season_date};
use crate::dom;
use crate::fetch::Fetcher;
use crate::options::Options;
use crate::result::{GridEntry, RaceClass};
use crate::results_table::{extract_grid_entries, ColumnSpec, FlagMarkers, GridContext};
use crate::section::{find_subsection, table_after, WIKITABLE_CLASS};
use crate::url_utils::{parse_base, resolve_href, season_url};
use crate::Result;

/// Cells a season-table row needs to describe a Grand Prix.
const MIN_SEASON_CELLS: usize = 6;

/// Scrape grid entries for every season in `options.years()`.
///
/// Seasons and reports that cannot be fetched are logged and skipped.
///
/// # Errors
///
/// Returns an error only if the configured wiki base URL is invalid.
pub fn scrape_grid<F: Fetcher + ?Sized>(
    fetcher: &F,
    options: &Options,
) -> Result<Harvest<GridEntry>> {
    let base = parse_base(&options.wiki_base_it)?;
    let walker = GridWalker {
        fetcher,
        base: &base,
        options,
        columns: options.column_spec(),
        flags: options.flag_filter(),
    };

    let mut harvest = Harvest::new();
    for year in options.years() {
        walker.season(year, &mut harvest);
    }

    info!(entries = harvest.len(), skipped = harvest.log.len(), "grid scrape finished");
    Ok(harvest)
}

struct GridWalker<'a, F: ?Sized> {
    fetcher: &'a F,
    base: &'a Url,
    options: &'a Options,
    columns: ColumnSpec,
    flags: FlagMarkers,
}

impl<F: Fetcher + ?Sized> GridWalker<'_, F> {
    fn season(&self, year: i32, harvest: &mut Harvest<GridEntry>) {
        let Some(url) = season_url(self.base, &self.options.season_path, year) else {
            harvest.skip(format!("No season page URL for {year}"));
            return;
        };
        debug!(year, url, "season");
        let Some(doc) = fetch_page(self.fetcher, &url, &mut harvest.log) else {
            return;
        };

        for table in doc.select(&format!("table.{WIKITABLE_CLASS}")).iter() {
            for row in dom::table_rows(&table).iter().skip(1) {
                self.season_row(year, row, harvest);
            }
        }
    }

    fn season_row(&self, year: i32, row: &Selection, harvest: &mut Harvest<GridEntry>) {
        let cells = dom::row_cells(row);
        if cells.len() < MIN_SEASON_CELLS {
            return;
        }

        let Some(report_url) = self.report_link(&cells[cells.len() - 1]) else {
            return;
        };

        let raw_date = dom::trimmed_text(&cells[0]);
        let context = GridContext {
            year,
            date: normalize_date(&raw_date)
                .or_else(|| season_date(year, &raw_date))
                .unwrap_or_default(),
            circuit: dom::trimmed_text(&cells[1]),
            official_name: dom::trimmed_text(&cells[2]),
            class: String::new(),
        };

        let Some(doc) = fetch_page(self.fetcher, &report_url, &mut harvest.log) else {
            return;
        };
        let before = harvest.len();
        let entries = report_entries(
            &doc,
            &context,
            self.options,
            &self.columns,
            &self.flags,
            &mut harvest.log,
        );
        harvest.extend(entries);

        if harvest.len() == before {
            harvest.skip(format!("No grid entries for {} ({report_url})", context.official_name));
        } else {
            debug!(race = context.official_name, entries = harvest.len() - before, "report read");
        }
    }

    /// URL of the first link in `cell` whose text names a race report.
    fn report_link(&self, cell: &Selection) -> Option<String> {
        let marker = self.options.report_link_text.to_lowercase();
        cell.select("a[href]").iter().find_map(|link| {
            if !dom::trimmed_text(&link).to_lowercase().contains(&marker) {
                return None;
            }
            resolve_href(self.base, &dom::get_attribute(&link, "href")?)
        })
    }
}

/// Grid entries from every configured class section of a race report.
///
/// Missing sections, sub-sections, tables and columns are logged.
pub fn report_entries(
    doc: &Document,
    race: &GridContext,
    options: &Options,
    columns: &ColumnSpec,
    flags: &FlagMarkers,
    log: &mut RunLog,
) -> Vec<GridEntry> {
    let mut entries = Vec::new();

    for (heading_id, label) in &options.class_sections {
        let class = RaceClass::from_title(label).map_or_else(|| label.clone(), |c| c.to_string());
        let Some(heading) = dom::find_by_id(doc, heading_id) else {
            log.record(format!("No {class} section for {}", race.official_name));
            continue;
        };

        let context = GridContext {
            class: class.clone(),
            ..race.clone()
        };

        for name in &options.subsections {
            let Some(anchor) = find_subsection(&heading, name) else {
                log.record(format!("No '{name}' section in {class} for {}", race.official_name));
                continue;
            };
            let Some(table) = table_after(&anchor) else {
                log.record(format!("No '{name}' table in {class} for {}", race.official_name));
                continue;
            };
            match extract_grid_entries(&table, &context, columns, flags, log) {
                Ok(found) => entries.extend(found),
                Err(err) => {
                    log.record(format!("{err} in '{name}' ({class}) for {}", race.official_name));
                }
            }
        }
    }

    entries
}
