//! Section discovery on encyclopedia pages.
//!
//! Pages for the same kind of event are laid out inconsistently: the
//! winners list may sit under any of several heading ids, headings may be
//! wrapped in `div.mw-heading` containers or carry their id on an inner
//! `span.mw-headline`, and result tables follow their sub-heading as
//! siblings. The helpers here hide those differences.

use dom_query::{Document, Selection};

use crate::dom;

/// Class of the container newer page markup wraps headings in.
pub const HEADING_WRAPPER_CLASS: &str = "mw-heading";

/// Class of the span older markup puts the heading text and id on.
pub const HEADLINE_CLASS: &str = "mw-headline";

/// Class of the tables holding listings and results.
pub const WIKITABLE_CLASS: &str = "wikitable";

/// First element whose id is one of `candidates`, trying them in order.
#[must_use]
pub fn find_first_by_ids<'a, S: AsRef<str>>(
    doc: &'a Document,
    candidates: &[S],
) -> Option<Selection<'a>> {
    candidates
        .iter()
        .find_map(|candidate| dom::find_by_id(doc, candidate.as_ref()))
}

/// The element that stands for a heading among its siblings.
///
/// That is the `div.mw-heading` wrapper when there is one, the enclosing
/// `h1`-`h6` when the id sits on an inner span, or the element itself.
#[must_use]
pub fn heading_anchor<'a>(heading: &Selection<'a>) -> Selection<'a> {
    if let Some(wrapper) = dom::find_parent_with_class(heading, "div", HEADING_WRAPPER_CLASS) {
        return wrapper;
    }
    let parent = heading.parent();
    if is_heading_tag(&parent) {
        return parent;
    }
    heading.clone()
}

/// Visible heading text, without edit-section links.
#[must_use]
pub fn heading_text(heading: &Selection) -> String {
    let headline = heading.select_single(&format!(".{HEADLINE_CLASS}"));
    if headline.exists() {
        dom::trimmed_text(&headline)
    } else {
        dom::trimmed_text(heading)
    }
}

fn is_heading_tag(sel: &Selection) -> bool {
    ["h1", "h2", "h3", "h4", "h5", "h6"]
        .iter()
        .any(|tag| dom::is_tag(sel, tag))
}

/// The `tag` heading an anchor element is or wraps.
fn heading_within<'a>(anchor: &Selection<'a>, tag: &str) -> Option<Selection<'a>> {
    if dom::is_tag(anchor, tag) {
        return Some(anchor.clone());
    }
    let inner = anchor.select_single(tag);
    inner.exists().then_some(inner)
}

/// Find a sub-heading inside the section opened by `section_heading`.
///
/// Walks the siblings following the section's anchor and returns the anchor
/// of the first `h3` whose text contains `needle` (case-insensitive). The walk
/// stops at the next `h2`, so a sub-heading of a later section is never
/// attributed to this one.
#[must_use]
pub fn find_subsection<'a>(section_heading: &Selection<'a>, needle: &str) -> Option<Selection<'a>> {
    let needle = needle.to_lowercase();
    let mut current = dom::next_element_sibling(&heading_anchor(section_heading));

    while let Some(sibling) = current {
        if heading_within(&sibling, "h2").is_some() {
            return None;
        }
        if let Some(h3) = heading_within(&sibling, "h3") {
            if heading_text(&h3).to_lowercase().contains(&needle) {
                return Some(sibling);
            }
        }
        current = dom::next_element_sibling(&sibling);
    }

    None
}

/// The results table following a sub-heading anchor.
#[must_use]
pub fn table_after<'a>(anchor: &Selection<'a>) -> Option<Selection<'a>> {
    dom::next_sibling_with_class(anchor, "table", WIKITABLE_CLASS)
}

/// Tables following a heading, up to a terminating `h2`.
///
/// Created by [`tables_until`].
#[derive(Debug, Clone)]
pub struct TableChain<'a> {
    cursor: Option<Selection<'a>>,
    terminator: String,
}

impl<'a> TableChain<'a> {
    /// Next table after `from`, unless the terminating heading comes first.
    fn advance(&self, from: &Selection<'a>) -> Option<Selection<'a>> {
        let mut cursor = from.clone();
        loop {
            let found = dom::find_next_of(&cursor, &["table", "h2"])?;
            if dom::is_tag(&found, "table") {
                return Some(found);
            }
            if heading_text(&found) == self.terminator {
                return None;
            }
            cursor = found;
        }
    }
}

impl<'a> Iterator for TableChain<'a> {
    type Item = Selection<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.take()?;
        let table = self.advance(&cursor)?;
        self.cursor = Some(table.clone());
        Some(table)
    }
}

/// Chain the tables after `start` in document order.
///
/// Yields each following table in turn and ends at the first `h2` reading
/// `terminator` (e.g. "References"), or when the page runs out of tables.
#[must_use]
pub fn tables_until<'a>(start: &Selection<'a>, terminator: &str) -> TableChain<'a> {
    TableChain {
        cursor: Some(start.clone()),
        terminator: terminator.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"<html><body><div class="mw-parser-output">
        <div class="mw-heading mw-heading2"><h2 id="MotoGP">MotoGP</h2></div>
        <div class="mw-heading mw-heading3"><h3 id="Arrivati">Arrivati al traguardo</h3></div>
        <table class="wikitable" id="motogp-finish"><tr><th>Pilota</th></tr></table>
        <div class="mw-heading mw-heading3"><h3 id="Ritirati">Ritirati</h3></div>
        <p>Note</p>
        <table class="wikitable" id="motogp-ret"><tr><th>Pilota</th></tr></table>
        <div class="mw-heading mw-heading2"><h2 id="Moto2">Moto2</h2></div>
        <div class="mw-heading mw-heading3"><h3>Squalificati</h3></div>
        <table class="wikitable" id="moto2-dsq"><tr><th>Pilota</th></tr></table>
    </div></body></html>"#;

    #[test]
    fn candidate_ids_are_tried_in_order() {
        let doc = Document::from(REPORT);
        let found = find_first_by_ids(&doc, &["By_year", "Moto2", "MotoGP"]);
        assert_eq!(found.and_then(|h| dom::id(&h)), Some("Moto2".to_string()));
        assert!(find_first_by_ids(&doc, &["By_year", "Winners_by_season"]).is_none());
    }

    #[test]
    fn subsection_and_table_are_found() {
        let doc = Document::from(REPORT);
        let motogp = doc.select("#MotoGP");

        let finishers = find_subsection(&motogp, "arrivati al traguardo");
        let table = finishers.and_then(|a| table_after(&a));
        assert_eq!(table.and_then(|t| dom::id(&t)), Some("motogp-finish".to_string()));

        let retirees = find_subsection(&motogp, "RITIRATI");
        let table = retirees.and_then(|a| table_after(&a));
        assert_eq!(table.and_then(|t| dom::id(&t)), Some("motogp-ret".to_string()));
    }

    #[test]
    fn subsection_search_stops_at_next_section() {
        let doc = Document::from(REPORT);
        let motogp = doc.select("#MotoGP");
        assert!(find_subsection(&motogp, "squalificati").is_none());
    }

    #[test]
    fn legacy_headline_markup_is_supported() {
        let doc = Document::from(
            r#"<body>
                <h2><span class="mw-headline" id="MotoGP">MotoGP</span><span class="mw-editsection">[modifica]</span></h2>
                <h3><span class="mw-headline">Ritirati</span></h3>
                <table class="wikitable" id="ret"></table>
            </body>"#,
        );
        let heading = doc.select("#MotoGP");
        let table = find_subsection(&heading, "ritirati").and_then(|a| table_after(&a));
        assert_eq!(table.and_then(|t| dom::id(&t)), Some("ret".to_string()));
    }

    #[test]
    fn table_chain_stops_at_terminator() {
        let doc = Document::from(
            r#"<body>
                <div class="mw-heading"><h2 id="By_year">By year</h2></div>
                <table id="t1"></table>
                <h3>1990s</h3>
                <table id="t2"></table>
                <div class="mw-heading"><h2 id="References">References</h2></div>
                <table id="navbox"></table>
            </body>"#,
        );
        let heading = doc.select("#By_year");
        let ids: Vec<String> = tables_until(&heading, "References")
            .filter_map(|t| dom::id(&t))
            .collect();
        assert_eq!(ids, vec!["t1", "t2"]);
    }

    #[test]
    fn table_chain_runs_to_end_without_terminator() {
        let doc = Document::from(
            r#"<body><h2 id="Winners">Winners</h2><table id="a"></table><h2>See also</h2><table id="b"></table></body>"#,
        );
        let heading = doc.select("#Winners");
        assert_eq!(tables_until(&heading, "References").count(), 2);
    }
}
