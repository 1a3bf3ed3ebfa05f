//! Run accumulators.
//!
//! A scrape run owns exactly one [`Harvest`]: the records extracted so far,
//! in extraction order, plus the diagnostic lines for every unit of work
//! that was skipped. Nothing is flushed until the run ends.

use tracing::warn;

/// Diagnostic lines for skipped or failed units of work.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunLog {
    entries: Vec<String>,
}

impl RunLog {
    /// Append one diagnostic line; also emitted as a `warn` event.
    pub fn record(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{message}");
        self.entries.push(message);
    }

    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The log as file contents: one line per entry.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.entries.join("\n")
    }
}

/// Ordered records of one run plus its log.
#[derive(Debug, Clone, PartialEq)]
pub struct Harvest<T> {
    pub records: Vec<T>,
    pub log: RunLog,
}

impl<T> Default for Harvest<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            log: RunLog::default(),
        }
    }
}

impl<T> Harvest<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: T) {
        self.records.push(record);
    }

    pub fn extend<I: IntoIterator<Item = T>>(&mut self, records: I) {
        self.records.extend(records);
    }

    /// Record why a unit of work was skipped.
    pub fn skip(&mut self, reason: impl Into<String>) {
        self.log.record(reason);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
