//! Label/value table extraction (infoboxes).
//!
//! An infobox is a table whose rows pair a header cell (the label) with a
//! data cell (the value). Callers name the labels they care about; every
//! other row is ignored.

use std::collections::BTreeMap;

use dom_query::{Document, Selection};

use crate::dom;

/// Class marking an infobox table.
pub const INFOBOX_CLASS: &str = "infobox";

/// How a row's label is compared with the allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelMatch {
    /// Trimmed label must equal an allow-list entry exactly.
    #[default]
    Exact,
    /// Lower-cased label must contain a (lower-cased) allow-list entry.
    Contains,
}

/// Labels to keep and how to recognize them.
#[derive(Debug, Clone, Default)]
pub struct LabelSet {
    labels: Vec<String>,
    matching: LabelMatch,
}

impl LabelSet {
    /// Exact, case-sensitive label matching.
    pub fn exact<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            matching: LabelMatch::Exact,
        }
    }

    /// Case-insensitive substring matching.
    pub fn containing<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(|l| l.into().to_lowercase()).collect(),
            matching: LabelMatch::Contains,
        }
    }

    /// Allow-list entry a row label matches, if any.
    ///
    /// Output maps are keyed by the entry, so substring matches on
    /// `"Nome ufficiale del GP"` land under `"nome ufficiale"`.
    #[must_use]
    pub fn resolve(&self, label: &str) -> Option<&str> {
        let entry = match self.matching {
            LabelMatch::Exact => self.labels.iter().find(|l| l.as_str() == label),
            LabelMatch::Contains => {
                let label = label.to_lowercase();
                self.labels.iter().find(|l| label.contains(l.as_str()))
            }
        };
        entry.map(String::as_str)
    }
}

/// First infobox table on the page.
#[must_use]
pub fn find_infobox(doc: &Document) -> Option<Selection<'_>> {
    dom::find_by_class(doc, "table", INFOBOX_CLASS)
}

/// Every recognized label/value row of a key-value table, in page order.
///
/// Rows without both a header and a data cell are skipped. Repeated labels
/// appear once per row, keyed by their allow-list entry.
#[must_use]
pub fn labeled_rows(table: &Selection, labels: &LabelSet) -> Vec<(String, String)> {
    dom::table_rows(table)
        .iter()
        .filter_map(|row| {
            let header = row.select_single("th");
            let value = row.select_single("td");
            if !header.exists() || !value.exists() {
                return None;
            }
            let key = labels.resolve(&dom::trimmed_text(&header))?;
            Some((key.to_string(), dom::trimmed_text(&value)))
        })
        .collect()
}

/// Extract recognized label/value rows from a key-value table.
///
/// When a label repeats, the last row wins. Returns `None` if no row matched.
#[must_use]
pub fn extract_labeled_table(
    table: &Selection,
    labels: &LabelSet,
) -> Option<BTreeMap<String, String>> {
    let data: BTreeMap<String, String> = labeled_rows(table, labels).into_iter().collect();
    (!data.is_empty()).then_some(data)
}

/// Locate the page's infobox and extract it.
#[must_use]
pub fn extract_infobox(doc: &Document, labels: &LabelSet) -> Option<BTreeMap<String, String>> {
    let table = find_infobox(doc)?;
    extract_labeled_table(&table, labels)
}
