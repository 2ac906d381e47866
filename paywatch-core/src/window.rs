//! Report window arithmetic and YYYYMMDD date conversion.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive date range the matcher searches, symmetric around the run date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportWindow {
    /// `[today - half_width, today + half_width]`, both ends inclusive.
    pub fn around(today: NaiveDate, half_width_days: i64) -> Self {
        Self {
            start: today - Duration::days(half_width_days),
            end: today + Duration::days(half_width_days),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Parse the server's 8-digit YYYYMMDD integer into a calendar date.
///
/// Window arithmetic must never be done on the raw integer; everything past
/// the decode boundary works in `NaiveDate`.
pub fn date_from_int(v: i64) -> Option<NaiveDate> {
    if !(10_000_000..=99_999_999).contains(&v) {
        return None;
    }
    let year = (v / 10_000) as i32;
    let month = ((v / 100) % 100) as u32;
    let day = (v % 100) as u32;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Inverse of [`date_from_int`], for building server-side range queries.
pub fn date_to_int(d: NaiveDate) -> i64 {
    use chrono::Datelike;
    d.year() as i64 * 10_000 + d.month() as i64 * 100 + d.day() as i64
}
