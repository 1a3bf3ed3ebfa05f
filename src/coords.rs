//! Circuit coordinate extraction.
//!
//! Circuit pages carry their position either as decimal `data-lat` /
//! `data-lon` attributes on a map link, or only as degree-minute-second
//! text such as `41°33′36″N 2°9′42″E`. The attributes win when present.

use dom_query::{Document, Selection};

use crate::dom;
use crate::patterns::DMS_PAIR;
use crate::result::CircuitCoordinate;

/// Id of the element wrapping the page's title coordinates.
pub const COORDINATES_ID: &str = "coordinates";

/// Class of the map link carrying decimal attributes.
pub const MAPLINK_CLASS: &str = "mw-kartographer-maplink";

/// Extract coordinates from the page's coordinate region.
///
/// Returns `None` when the page has no coordinate region or neither form
/// inside it is usable.
#[must_use]
pub fn find_coordinates(doc: &Document) -> Option<CircuitCoordinate> {
    let region = dom::find_by_id(doc, COORDINATES_ID)?;
    extract_coordinates(&region)
}

/// Extract coordinates from a region of the page.
#[must_use]
pub fn extract_coordinates(region: &Selection) -> Option<CircuitCoordinate> {
    decimal_attributes(region).or_else(|| parse_dms(&dom::text_content(region)))
}

/// Decimal `data-lat` / `data-lon` on the region's map link.
fn decimal_attributes(region: &Selection) -> Option<CircuitCoordinate> {
    let link = region
        .select("a")
        .iter()
        .find(|a| dom::has_class(a, MAPLINK_CLASS))?;

    let latitude = dom::get_attribute(&link, "data-lat")?.trim().parse::<f64>().ok()?;
    let longitude = dom::get_attribute(&link, "data-lon")?.trim().parse::<f64>().ok()?;
    Some(CircuitCoordinate { latitude, longitude })
}

/// Parse a degree-minute-second pair into signed decimal degrees.
///
/// Southern latitudes and western longitudes are negative.
///
/// ```rust
/// use gp_scrape::coords::parse_dms;
///
/// let c = parse_dms("41°33′36″N 2°9′42″E").unwrap();
/// assert!((c.latitude - 41.56).abs() < 1e-9);
/// assert!((c.longitude - 2.161_666).abs() < 1e-5);
/// ```
#[must_use]
pub fn parse_dms(text: &str) -> Option<CircuitCoordinate> {
    let caps = DMS_PAIR.captures(text)?;

    let latitude = to_decimal(&caps[1], &caps[2], &caps[3])?;
    let longitude = to_decimal(&caps[5], &caps[6], &caps[7])?;

    Some(CircuitCoordinate {
        latitude: if caps[4].eq_ignore_ascii_case("S") { -latitude } else { latitude },
        longitude: if caps[8].eq_ignore_ascii_case("W") { -longitude } else { longitude },
    })
}

fn to_decimal(degrees: &str, minutes: &str, seconds: &str) -> Option<f64> {
    let degrees: f64 = degrees.parse().ok()?;
    let minutes: f64 = minutes.parse().ok()?;
    let seconds: f64 = seconds.parse().ok()?;
    Some(degrees + minutes / 60.0 + seconds / 3600.0)
}
