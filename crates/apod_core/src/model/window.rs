//! Inclusive calendar-date window.
//!
//! # Invariants
//! - `start <= end` for every window built through [`DateWindow::new`].
//! - Windows are immutable values; normalization always builds a new one.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Number of calendar days a full gallery window spans.
pub const WINDOW_DAYS: u64 = 9;

/// ISO-8601 calendar date format used on every external surface.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive `[start, end]` range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Builds a window, swapping endpoints given in reverse order.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if end < start {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    /// Full-length window beginning at `start`.
    ///
    /// Returns `None` only when the end would overflow the calendar.
    pub fn starting_at(start: NaiveDate) -> Option<Self> {
        start
            .checked_add_days(Days::new(WINDOW_DAYS - 1))
            .map(|end| Self { start, end })
    }

    /// Number of calendar days covered, both ends included.
    pub fn day_count(&self) -> u64 {
        (self.end - self.start).num_days().unsigned_abs() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn start_iso(&self) -> String {
        self.start.format(ISO_DATE_FORMAT).to_string()
    }

    pub fn end_iso(&self) -> String {
        self.end.format(ISO_DATE_FORMAT).to_string()
    }
}

impl Display for DateWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(ISO_DATE_FORMAT),
            self.end.format(ISO_DATE_FORMAT)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{DateWindow, WINDOW_DAYS};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn starting_at_spans_full_window() {
        let window = DateWindow::starting_at(date(2025, 9, 20)).unwrap();
        assert_eq!(window.end, date(2025, 9, 28));
        assert_eq!(window.day_count(), WINDOW_DAYS);
    }

    #[test]
    fn new_orders_reversed_endpoints() {
        let window = DateWindow::new(date(2025, 3, 5), date(2025, 3, 1));
        assert_eq!(window.start, date(2025, 3, 1));
        assert_eq!(window.end, date(2025, 3, 5));
        assert!(window.contains(date(2025, 3, 3)));
        assert!(!window.contains(date(2025, 3, 6)));
    }

    #[test]
    fn display_and_serde_use_iso_dates() {
        let window = DateWindow::new(date(2024, 2, 28), date(2024, 3, 7));
        assert_eq!(window.to_string(), "2024-02-28 to 2024-03-07");

        let json = serde_json::to_value(window).unwrap();
        assert_eq!(json["start"], "2024-02-28");
        assert_eq!(json["end"], "2024-03-07");
    }
}
