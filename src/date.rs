//! Date normalization.
//!
//! Race pages write dates in whatever shape the editor liked: English month
//! names in either order, ISO dates, abbreviated months, comma-separated
//! alternatives, day ranges and Italian month names. Everything here turns
//! such text into an ISO `YYYY-MM-DD` string or reports that it could not.
//! A date is never partially parsed: either all of year, month and day are
//! known and valid, or the result is `None`.

use chrono::NaiveDate;

use crate::patterns::{BARE_DAY, DAY_RANGE, NAMED_DMY, NUMERIC_DMY, ORDINAL_MARK, RANGE_DASH, YEAR};

/// Formats tried in order on English-style dates. First match wins.
const DATE_FORMATS: &[&str] = &[
    "%B %d, %Y", // June 14, 2023
    "%d %B %Y",  // 14 June 2023
    "%Y-%m-%d",  // 2023-06-14
    "%B %d %Y",  // June 14 2023
    "%b %d, %Y", // Jun 14, 2023
    "%d %b %Y",  // 14 Jun 2023
];

/// Italian month names and their two-digit numbers.
const ITALIAN_MONTHS: [(&str, &str); 12] = [
    ("gennaio", "01"),
    ("febbraio", "02"),
    ("marzo", "03"),
    ("aprile", "04"),
    ("maggio", "05"),
    ("giugno", "06"),
    ("luglio", "07"),
    ("agosto", "08"),
    ("settembre", "09"),
    ("ottobre", "10"),
    ("novembre", "11"),
    ("dicembre", "12"),
];

/// Two-digit month number for an Italian month name (case-insensitive).
#[must_use]
pub fn month_number(name: &str) -> Option<&'static str> {
    let name = name.trim().to_lowercase();
    ITALIAN_MONTHS
        .iter()
        .find(|(month, _)| *month == name)
        .map(|(_, number)| *number)
}

/// Normalize free-text date to `YYYY-MM-DD`.
///
/// Returns `None` for empty input, a bare day number, or anything no
/// supported format accepts.
///
/// ```rust
/// use gp_scrape::date::normalize_date;
///
/// assert_eq!(normalize_date("June 14, 2023").as_deref(), Some("2023-06-14"));
/// assert_eq!(normalize_date("14–16 June 2023").as_deref(), Some("2023-06-14"));
/// assert_eq!(normalize_date("12 giugno 2023").as_deref(), Some("2023-06-12"));
/// assert_eq!(normalize_date("14"), None);
/// ```
#[must_use]
pub fn normalize_date(raw: &str) -> Option<String> {
    parse_date(raw).map(|date| date.format("%Y-%m-%d").to_string())
}

/// Same as [`normalize_date`], returning the parsed date.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = clean(raw);
    if is_unusable(&cleaned) {
        return None;
    }

    if let Some(date) = parse_with_formats(&cleaned) {
        return Some(date);
    }

    let reduced = reduce_variants(&cleaned);
    if reduced != cleaned && !is_unusable(&reduced) {
        if let Some(date) = parse_with_formats(&reduced) {
            return Some(date);
        }
        if let Some(date) = parse_localized_date(&reduced) {
            return Some(date);
        }
    }

    parse_localized_date(&cleaned)
}

/// Locale path: `day-month-year` with numeric months, or `day name year`
/// with an Italian month name.
///
/// ```rust
/// use chrono::NaiveDate;
/// use gp_scrape::date::parse_localized_date;
///
/// assert_eq!(parse_localized_date("1º maggio 2011"), NaiveDate::from_ymd_opt(2011, 5, 1));
/// assert_eq!(parse_localized_date("12-06-2023"), NaiveDate::from_ymd_opt(2023, 6, 12));
/// assert_eq!(parse_localized_date("12-13 giugno 2021"), NaiveDate::from_ymd_opt(2021, 6, 12));
/// ```
#[must_use]
pub fn parse_localized_date(raw: &str) -> Option<NaiveDate> {
    let text = ORDINAL_MARK.replace_all(raw.trim(), "");
    let text = match DAY_RANGE.captures(&text) {
        Some(caps) => format!("{}{}", &caps[1], &caps[2]),
        None => text.into_owned(),
    };

    if let Some(caps) = NUMERIC_DMY.captures(&text) {
        return ymd(&caps[3], &caps[2], &caps[1]);
    }

    let caps = NAMED_DMY.captures(&text)?;
    let month = month_number(&caps[2])?;
    ymd(&caps[3], month, &caps[1])
}

/// First day and two-digit month of a season-calendar date without a year.
///
/// Handles ordinal marks and day ranges, keeping the first day:
/// `"12-13 giugno"` gives `(12, "06")`, `"1º maggio"` gives `(1, "05")`.
#[must_use]
pub fn extract_day_month(raw: &str) -> Option<(u32, &'static str)> {
    let text = ORDINAL_MARK.replace_all(raw, "");
    let mut parts = text.split_whitespace();
    let day_part = parts.next()?;
    let month_part = parts.next()?;

    let first_day = RANGE_DASH.split(day_part).next()?;
    let day: u32 = first_day.parse().ok()?;
    if day == 0 {
        return None;
    }

    Some((day, month_number(month_part)?))
}

/// Full ISO date for a season-calendar entry in `year`.
#[must_use]
pub fn season_date(year: i32, raw: &str) -> Option<String> {
    let (day, month) = extract_day_month(raw)?;
    let month: u32 = month.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day).map(|date| date.format("%Y-%m-%d").to_string())
}

fn clean(raw: &str) -> String {
    raw.replace(['\n', '\r'], " ").trim().to_string()
}

fn is_unusable(text: &str) -> bool {
    text.is_empty() || BARE_DAY.is_match(text)
}

fn parse_with_formats(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Reduce comma-separated alternatives and day ranges to a single date.
fn reduce_variants(text: &str) -> String {
    let mut current = text.to_string();

    if current.contains(',') {
        let parts: Vec<&str> = current.split(',').map(str::trim).collect();
        current = parts
            .iter()
            .find(|part| YEAR.is_match(part))
            .or_else(|| parts.first())
            .map(|part| (*part).to_string())
            .unwrap_or_default();
    }

    if let Some(caps) = DAY_RANGE.captures(&current) {
        return format!("{}{}", &caps[1], &caps[2]);
    }

    if let Some((before, _)) = current.split_once('–') {
        return before.trim().to_string();
    }

    current
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}
