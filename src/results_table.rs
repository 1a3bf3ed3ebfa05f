//! Results-listing table extraction.
//!
//! A results table has a header row naming its columns and one data row per
//! rider. Only two columns matter: the rider and the grid (or finishing)
//! position. They are found by header name, so column order and extra
//! columns (number, team, laps, time) do not affect extraction.

use dom_query::Selection;
use tracing::debug;

use crate::collector::RunLog;
use crate::dom;
use crate::result::GridEntry;
use crate::{Error, Result};

/// Decides whether a link inside a rider cell names the rider.
///
/// Rider cells usually start with a nationality flag that is itself a link.
/// Implementations look at the link's `title` attribute.
pub trait RiderLinkFilter {
    /// `true` when a link titled `title` may carry the rider's name.
    fn accepts(&self, title: &str) -> bool;
}

impl<F> RiderLinkFilter for F
where
    F: Fn(&str) -> bool,
{
    fn accepts(&self, title: &str) -> bool {
        self(title)
    }
}

/// Rejects links whose title mentions any flag marker (case-insensitive).
#[derive(Debug, Clone)]
pub struct FlagMarkers {
    markers: Vec<String>,
}

impl FlagMarkers {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(|m| m.into().to_lowercase()).collect(),
        }
    }
}

impl Default for FlagMarkers {
    /// Italian and English flag titles ("Bandiera della Spagna", "Spain (flag)").
    fn default() -> Self {
        Self::new(["bandiera", "flag"])
    }
}

impl RiderLinkFilter for FlagMarkers {
    fn accepts(&self, title: &str) -> bool {
        let title = title.to_lowercase();
        !self.markers.iter().any(|marker| title.contains(marker.as_str()))
    }
}

/// Accepted header names for the two required columns.
///
/// Names are compared with the lower-cased, trimmed header text; the first
/// listed name present in the header wins.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub rider: Vec<String>,
    pub position: Vec<String>,
}

impl ColumnSpec {
    pub fn new<I, J, S, T>(rider: I, position: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            rider: rider.into_iter().map(|n| n.into().to_lowercase()).collect(),
            position: position.into_iter().map(|n| n.into().to_lowercase()).collect(),
        }
    }
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self::new(["pilota", "rider"], ["griglia", "grid"])
    }
}

/// Fields shared by every row of one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridContext {
    pub year: i32,
    pub date: String,
    pub circuit: String,
    pub official_name: String,
    pub class: String,
}

impl GridContext {
    fn entry(&self, rider_name: String, position: String) -> GridEntry {
        GridEntry {
            year: self.year,
            date: self.date.clone(),
            circuit: self.circuit.clone(),
            official_name: self.official_name.clone(),
            class: self.class.clone(),
            rider_name,
            position,
        }
    }
}

/// Rider name from a rider cell.
///
/// The text of the first titled link the filter accepts, or else the whole
/// cell text with whitespace collapsed.
#[must_use]
pub fn rider_name<F: RiderLinkFilter + ?Sized>(cell: &Selection, filter: &F) -> String {
    let from_link = cell.select("a").iter().find_map(|link| {
        let title = dom::get_attribute(&link, "title")?;
        if !filter.accepts(&title) {
            return None;
        }
        let text = dom::collapsed_text(&link);
        (!text.is_empty()).then_some(text)
    });

    from_link.unwrap_or_else(|| dom::collapsed_text(cell))
}

/// Index of the first header matching any accepted name.
fn column_index(headers: &[String], names: &[String]) -> Option<usize> {
    names
        .iter()
        .find_map(|name| headers.iter().position(|header| header == name))
}

/// Extract one [`GridEntry`] per data row.
///
/// Fails when the header lacks either required column. Rows too short to
/// reach both columns are reported to `log` and skipped; rows with an empty
/// rider or position are dropped silently.
///
/// # Errors
///
/// Returns [`Error::MissingElement`] for a table without rows and
/// [`Error::MissingColumn`] when a required column is absent.
pub fn extract_grid_entries<F: RiderLinkFilter + ?Sized>(
    table: &Selection,
    context: &GridContext,
    columns: &ColumnSpec,
    filter: &F,
    log: &mut RunLog,
) -> Result<Vec<GridEntry>> {
    let rows = dom::table_rows(table);
    let (header, data_rows) = rows
        .split_first()
        .ok_or_else(|| Error::MissingElement("results table has no rows".to_string()))?;

    let headers: Vec<String> = dom::row_cells(header)
        .iter()
        .map(|cell| dom::trimmed_text(cell).to_lowercase())
        .collect();

    let rider_idx = column_index(&headers, &columns.rider)
        .ok_or_else(|| Error::MissingColumn(columns.rider.join("/")))?;
    let position_idx = column_index(&headers, &columns.position)
        .ok_or_else(|| Error::MissingColumn(columns.position.join("/")))?;
    let needed = rider_idx.max(position_idx);

    let mut entries = Vec::new();
    for (row_number, row) in data_rows.iter().enumerate() {
        let cells = dom::row_cells(row);
        if cells.len() <= needed {
            log.record(
                Error::MalformedRow(format!(
                    "{} {} ({}): row {} has {} cells, need {}",
                    context.circuit,
                    context.year,
                    context.class,
                    row_number + 1,
                    cells.len(),
                    needed + 1
                ))
                .to_string(),
            );
            continue;
        }

        let rider = rider_name(&cells[rider_idx], filter);
        let position = dom::trimmed_text(&cells[position_idx]);
        if rider.is_empty() || position.is_empty() {
            debug!(row = row_number + 1, "dropping row without rider or position");
            continue;
        }

        entries.push(context.entry(rider, position));
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom_query::Document;

    fn context() -> GridContext {
        GridContext {
            year: 2023,
            date: "2023-06-18".to_string(),
            circuit: "Sachsenring".to_string(),
            official_name: "Liqui Moly Motorrad Grand Prix Deutschland".to_string(),
            class: "MotoGP".to_string(),
        }
    }

    fn extract_default(table: &Selection, log: &mut RunLog) -> Result<Vec<GridEntry>> {
        let columns = ColumnSpec::default();
        extract_grid_entries(table, &context(), &columns, &FlagMarkers::default(), log)
    }

    #[test]
    fn rider_name_skips_flag_links() {
        let doc = Document::from(
            r#"<table><tr><td>
                <a href="/wiki/Spain" title="Spain (flag)"><img alt="Spain"></a>
                <a href="/wiki/Marc_M%C3%A1rquez" title="Marc Márquez">Marc Márquez</a>
            </td></tr></table>"#,
        );
        let cell = doc.select("td");
        assert_eq!(rider_name(&cell, &FlagMarkers::default()), "Marc Márquez");
    }

    #[test]
    fn rider_name_falls_back_to_collapsed_text() {
        let doc = Document::from(
            r#"<table><tr><td>
                <a href="/wiki/Italia" title="Bandiera dell'Italia">IT</a>
                Valentino
                   Rossi
            </td></tr></table>"#,
        );
        let cell = doc.select("td");
        assert_eq!(rider_name(&cell, &FlagMarkers::default()), "IT Valentino Rossi");
    }

    #[test]
    fn untitled_links_are_ignored() {
        let doc = Document::from(
            r#"<table><tr><td><a href="/x">Nickname</a> Jorge Lorenzo</td></tr></table>"#,
        );
        let cell = doc.select("td");
        assert_eq!(rider_name(&cell, &FlagMarkers::default()), "Nickname Jorge Lorenzo");
    }

    #[test]
    fn closure_filters_are_accepted() {
        let doc = Document::from(
            r#"<table><tr><td><a title="Drapeau de la France">FR</a><a title="Johann Zarco">Johann Zarco</a></td></tr></table>"#,
        );
        let cell = doc.select("td");
        let french = |title: &str| !title.starts_with("Drapeau");
        assert_eq!(rider_name(&cell, &french), "Johann Zarco");
    }

    #[test]
    fn extracts_rider_and_grid_columns() {
        let doc = Document::from(
            r#"<table class="wikitable">
                <tr><th>Pos</th><th>No</th><th>Rider</th><th>Team</th><th>Laps</th><th>Time</th><th>Grid</th></tr>
                <tr><td>1</td><td>93</td><td><a title="Test Rider">Test Rider</a></td><td>Team</td><td>30</td><td>41:00.000</td><td>5</td></tr>
            </table>"#,
        );
        let table = doc.select("table");
        let mut log = RunLog::default();
        let entries = extract_default(&table, &mut log);

        let entries = entries.unwrap_or_default();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].rider_name, "Test Rider");
        assert_eq!(entries[0].position, "5");
        assert_eq!(entries[0].year, 2023);
        assert_eq!(entries[0].circuit, "Sachsenring");
        assert!(log.is_empty());
    }

    #[test]
    fn position_text_is_kept_verbatim() {
        let doc = Document::from(
            r#"<table>
                <tr><th>Pilota</th><th>Griglia</th></tr>
                <tr><td>Andrea Dovizioso</td><td> Ritirato </td></tr>
            </table>"#,
        );
        let table = doc.select("table");
        let mut log = RunLog::default();
        let entries = extract_default(&table, &mut log).unwrap_or_default();
        assert_eq!(entries.first().map(|e| e.position.as_str()), Some("Ritirato"));
    }

    #[test]
    fn missing_column_fails_whole_table() {
        let doc = Document::from(
            r#"<table><tr><th>Pos</th><th>Rider</th></tr><tr><td>1</td><td>X</td></tr></table>"#,
        );
        let table = doc.select("table");
        let mut log = RunLog::default();
        let result = extract_default(&table, &mut log);
        assert!(matches!(result, Err(Error::MissingColumn(_))));
    }

    #[test]
    fn short_rows_are_logged_and_skipped() {
        let doc = Document::from(
            r#"<table>
                <tr><th>Pilota</th><th>Team</th><th>Griglia</th></tr>
                <tr><td colspan="3">Gara interrotta</td></tr>
                <tr><td>Pecco Bagnaia</td><td>Ducati</td><td>1</td></tr>
                <tr><td></td><td>Ducati</td><td>2</td></tr>
            </table>"#,
        );
        let table = doc.select("table");
        let mut log = RunLog::default();
        let entries = extract_default(&table, &mut log).unwrap_or_default();
        assert_eq!(entries.len(), 1);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn extraction_is_repeatable() {
        let doc = Document::from(
            r#"<table><tr><th>Rider</th><th>Grid</th></tr><tr><td>A</td><td>1</td></tr><tr><td>B</td><td>2</td></tr></table>"#,
        );
        let table = doc.select("table");
        let mut log = RunLog::default();
        let first = extract_default(&table, &mut log).unwrap_or_default();
        let second = extract_default(&table, &mut log).unwrap_or_default();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }
}
