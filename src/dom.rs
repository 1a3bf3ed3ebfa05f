//! DOM Operations Adapter
//!
//! Thin helpers over the `dom_query` crate covering the handful of
//! navigation capabilities the extractors need: lookup by id or class,
//! text content, element siblings and a document-order "find next".
//!
//! Nothing in here mutates the tree.

// Re-export core types for external use
pub use dom_query::{Document, NodeRef, Selection};

pub use tendril::StrTendril;

use crate::patterns::WHITESPACE_NORMALIZE;

// === Attribute Operations ===

/// Get element ID attribute
#[inline]
#[must_use]
pub fn id(sel: &Selection) -> Option<String> {
    sel.attr("id").map(|s| s.to_string())
}

/// Get element class attribute
#[inline]
#[must_use]
pub fn class_name(sel: &Selection) -> Option<String> {
    sel.attr("class").map(|s| s.to_string())
}

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Check whether the class list contains `class` as a whole token.
#[must_use]
pub fn has_class(sel: &Selection, class: &str) -> bool {
    class_name(sel).is_some_and(|c| c.split_whitespace().any(|token| token == class))
}

// === Tag/Node Information ===

/// Get tag name (lowercase)
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::node_name)
        .map(|t| t.to_ascii_lowercase())
}

/// Check the element's tag name, ignoring case.
#[must_use]
pub fn is_tag(sel: &Selection, tag: &str) -> bool {
    tag_name(sel).is_some_and(|t| t.eq_ignore_ascii_case(tag))
}

fn node_is_tag(node: &NodeRef, tag: &str) -> bool {
    node.is_element()
        && node
            .node_name()
            .is_some_and(|name| name.eq_ignore_ascii_case(tag))
}

// === Text Content ===

/// Get all text content of node and descendants
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

/// Text content with leading and trailing whitespace removed.
#[must_use]
pub fn trimmed_text(sel: &Selection) -> String {
    sel.text().trim().to_string()
}

/// Text content with every whitespace run collapsed to a single space.
#[must_use]
pub fn collapsed_text(sel: &Selection) -> String {
    collapse_whitespace(&sel.text())
}

/// Collapse whitespace runs (including newlines) to single spaces and trim.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_NORMALIZE.replace_all(text.trim(), " ").into_owned()
}

// === Querying ===

/// Find the first element carrying `id`.
///
/// Uses an attribute selector so ids containing CSS-significant characters
/// (dots, parentheses) are still matched literally.
#[must_use]
pub fn find_by_id<'a>(doc: &'a Document, id: &str) -> Option<Selection<'a>> {
    let escaped = id.replace('\\', "\\\\").replace('"', "\\\"");
    let found = doc.select(&format!("[id=\"{escaped}\"]"));
    found.exists().then(|| found.first())
}

/// Find the first `tag` element whose class list contains `class`.
#[must_use]
pub fn find_by_class<'a>(doc: &'a Document, tag: &str, class: &str) -> Option<Selection<'a>> {
    doc.select(tag).iter().find(|sel| has_class(sel, class))
}

/// All `tag` elements whose class list contains every class in `classes`.
#[must_use]
pub fn find_all_by_classes<'a>(
    doc: &'a Document,
    tag: &str,
    classes: &[&str],
) -> Vec<Selection<'a>> {
    doc.select(tag)
        .iter()
        .filter(|sel| classes.iter().all(|class| has_class(sel, class)))
        .collect()
}

/// Direct child elements of `sel` with the given tag, in order.
#[must_use]
pub fn child_elements<'a>(sel: &Selection<'a>, tag: &str) -> Vec<Selection<'a>> {
    sel.children()
        .iter()
        .filter(|child| is_tag(child, tag))
        .collect()
}

/// Cells (`td` and `th`) of a table row, in column order.
#[must_use]
pub fn row_cells<'a>(row: &Selection<'a>) -> Vec<Selection<'a>> {
    row.children()
        .iter()
        .filter(|child| is_tag(child, "td") || is_tag(child, "th"))
        .collect()
}

/// Data cells (`td` only) of a table row.
#[must_use]
pub fn data_cells<'a>(row: &Selection<'a>) -> Vec<Selection<'a>> {
    child_elements(row, "td")
}

/// All rows of a table, header row included.
#[must_use]
pub fn table_rows<'a>(table: &Selection<'a>) -> Vec<Selection<'a>> {
    table.select("tr").iter().collect()
}

// === Tree Navigation ===

/// Get next element sibling (skipping text nodes)
#[must_use]
pub fn next_element_sibling<'a>(sel: &Selection<'a>) -> Option<Selection<'a>> {
    sel.nodes().first().and_then(|node| {
        let mut sibling = node.next_sibling();
        while let Some(s) = sibling {
            if s.is_element() {
                return Some(Selection::from(s));
            }
            sibling = s.next_sibling();
        }
        None
    })
}

/// First following element sibling that is a `tag` carrying `class`.
#[must_use]
pub fn next_sibling_with_class<'a>(
    sel: &Selection<'a>,
    tag: &str,
    class: &str,
) -> Option<Selection<'a>> {
    let mut current = next_element_sibling(sel);
    while let Some(sibling) = current {
        if is_tag(&sibling, tag) && has_class(&sibling, class) {
            return Some(sibling);
        }
        current = next_element_sibling(&sibling);
    }
    None
}

/// Node that follows the whole subtree of `node` in document order.
fn after_subtree<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    let mut current = Some(*node);
    while let Some(n) = current {
        if let Some(sibling) = n.next_sibling() {
            return Some(sibling);
        }
        current = n.parent();
    }
    None
}

/// Next element after `sel` in document order whose tag is any of `tags`.
///
/// Descendants of `sel` itself are skipped, so calling this on a table with
/// `["table"]` yields the next table on the page rather than a nested one.
#[must_use]
pub fn find_next_of<'a>(sel: &Selection<'a>, tags: &[&str]) -> Option<Selection<'a>> {
    let start = sel.nodes().first()?;
    let mut current = after_subtree(start);
    while let Some(node) = current {
        if tags.iter().any(|tag| node_is_tag(&node, tag)) {
            return Some(Selection::from(node));
        }
        current = node.first_child().or_else(|| after_subtree(&node));
    }
    None
}

/// Nearest ancestor that is a `tag` element carrying `class`.
#[must_use]
pub fn find_parent_with_class<'a>(
    sel: &Selection<'a>,
    tag: &str,
    class: &str,
) -> Option<Selection<'a>> {
    let mut current = sel.parent();
    while current.exists() {
        if is_tag(&current, tag) && has_class(&current, class) {
            return Some(current);
        }
        current = current.parent();
    }
    None
}

// === Parsing ===

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}
