//! Compiled regex patterns used by the extractors.
//!
//! All patterns are compiled once at first use with `LazyLock`.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Date Patterns
// =============================================================================

/// A bare day number with no month or year ("7", "14").
pub static BARE_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,2}$").expect("BARE_DAY regex")
});

/// A standalone four-digit year anywhere in the text.
pub static YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{4}\b").expect("YEAR regex")
});

/// A day range at the start of a date ("12-13 giugno 2023", "14–16 June 2023").
///
/// Group 1 is the first day, group 2 everything after the range.
pub static DAY_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})\s*[-–]\s*\d{1,2}(\s.*)$").expect("DAY_RANGE regex")
});

/// Numeric day-month-year with hyphen or en-dash separators ("12-06-2023").
pub static NUMERIC_DMY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})[-–](\d{1,2})[-–](\d{4})").expect("NUMERIC_DMY regex")
});

/// Day, month name, year ("12 giugno 2023").
pub static NAMED_DMY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})\s+(\w+)\s+(\d{4})").expect("NAMED_DMY regex")
});

/// Ordinal marks written after a day number ("1º maggio").
pub static ORDINAL_MARK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[º°ª]").expect("ORDINAL_MARK regex")
});

/// Hyphen or en-dash splitting a day range.
pub static RANGE_DASH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-–]").expect("RANGE_DASH regex")
});

// =============================================================================
// Coordinate Patterns
// =============================================================================

/// Degree-minute-second latitude followed by longitude.
///
/// Accepts both typographic (′ ″) and ASCII (' ") minute/second marks.
/// Groups: lat deg, min, sec, hemisphere, lon deg, min, sec, hemisphere.
pub static DMS_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(\d+)°\s*(\d+)[′']\s*(\d+(?:\.\d+)?)[″"]\s*([NSns])\s+(\d+)°\s*(\d+)[′']\s*(\d+(?:\.\d+)?)[″"]\s*([EWew])"#,
    )
    .expect("DMS_PAIR regex")
});

// =============================================================================
// Text Cleaning Patterns
// =============================================================================

/// Matches multiple whitespace characters for normalization.
pub static WHITESPACE_NORMALIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").expect("WHITESPACE_NORMALIZE regex")
});
