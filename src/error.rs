//! Error types for gp-scrape.
//!
//! Every failure a scrape run can meet is local to one unit of work (a row,
//! a page or a section). Drivers turn these into run-log lines and carry on;
//! only the starting page of a run is allowed to abort it.

/// Error type for fetching and extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request could not be sent or its body could not be read.
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The server answered with a non-success status.
    #[error("Unexpected status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// An expected table, heading or link is not on the page.
    #[error("Missing element: {0}")]
    MissingElement(String),

    /// A listing table has no column with any of the accepted header names.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Date text matched none of the supported formats.
    #[error("Unrecognized date: {0:?}")]
    UnparseableDate(String),

    /// Neither decimal attributes nor degree-minute-second text were usable.
    #[error("Unrecognized coordinates: {0:?}")]
    UnparseableCoordinate(String),

    /// A row has fewer cells than the extractor needs.
    #[error("Malformed row: {0}")]
    MalformedRow(String),

    /// Reading or writing an input/output file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// CSV serialization failed.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Result type alias for scrape operations.
pub type Result<T> = std::result::Result<T, Error>;
