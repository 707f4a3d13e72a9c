//! Time source for date defaults
//!
//! Date parameters default to two days before the current UTC date. The
//! clock is injectable so tests can pin the date; the server itself always
//! runs on wall-clock time.

use chrono::{Duration, NaiveDate, Utc};

/// Days subtracted from today to form the default date
const DEFAULT_DATE_OFFSET_DAYS: i64 = 2;

/// Source of the current calendar date
pub trait Clock: Send + Sync + 'static {
    /// Current date in UTC
    fn today(&self) -> NaiveDate;

    /// Default value for omitted date parameters, formatted `YYYY-MM-DD`
    ///
    /// Recomputed on every call, so it moves forward across midnight.
    fn default_date(&self) -> String {
        (self.today() - Duration::days(DEFAULT_DATE_OFFSET_DAYS))
            .format("%Y-%m-%d")
            .to_string()
    }
}

/// Wall-clock UTC time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// A clock frozen on one date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
