// Declared extent of one benchmark run

use chrono::{NaiveDateTime, NaiveTime};
use std::fmt;

/// Timestamp format of `TEST_START_TIME:` / `TEST_END_TIME:` marker lines
pub const RUN_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Start and end wall-clock time of a benchmark run
///
/// `start <= end` is expected but not enforced; an inverted window simply
/// matches less.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl RunWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Parse both bounds from `YYYY-MM-DD HH:MM:SS` text
    ///
    /// Returns `None` when either bound is unparseable, meaning the run
    /// cannot be correlated.
    ///
    /// # Example
    /// ```
    /// use benchmon::correlate::RunWindow;
    ///
    /// let window = RunWindow::parse("2025-11-22 15:33:10", "2025-11-22 15:33:50").unwrap();
    /// assert_eq!(window.duration().num_seconds(), 40);
    /// assert!(RunWindow::parse("", "2025-11-22 15:33:50").is_none());
    /// ```
    pub fn parse(start: &str, end: &str) -> Option<Self> {
        let start = NaiveDateTime::parse_from_str(start.trim(), RUN_TIMESTAMP_FORMAT).ok()?;
        let end = NaiveDateTime::parse_from_str(end.trim(), RUN_TIMESTAMP_FORMAT).ok()?;
        Some(Self { start, end })
    }

    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }

    /// Time-of-day bounds, dates stripped
    pub fn time_of_day(&self) -> (NaiveTime, NaiveTime) {
        (self.start.time(), self.end.time())
    }

    /// True when the end time of day precedes the start time of day
    ///
    /// Such a window cannot match in the time-of-day tier.
    pub fn crosses_midnight(&self) -> bool {
        self.end.time() < self.start.time()
    }
}

impl fmt::Display for RunWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ~ {}",
            self.start.format(RUN_TIMESTAMP_FORMAT),
            self.end.format(RUN_TIMESTAMP_FORMAT)
        )
    }
}
