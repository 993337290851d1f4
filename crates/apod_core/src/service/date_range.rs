//! Date-range normalization into a gallery window.
//!
//! # Responsibility
//! - Map optional user-supplied start/end dates to one [`DateWindow`].
//! - Keep every derived window inside the range the feed has data for.
//!
//! # Invariants
//! - Never fails: every input combination, including none, yields a window.
//! - The anchor is clamped into `[epoch_min, today]` before the other
//!   endpoint is derived; the derived endpoint is clamped afterwards too,
//!   which may shorten the window at the boundaries.
//! - When both dates are supplied, `start` wins and `end` is re-derived.
//! - Pure apart from reading the injected clock.

use crate::clock::{Clock, SystemClock};
use crate::model::window::{DateWindow, ISO_DATE_FORMAT, WINDOW_DAYS};
use chrono::{Days, NaiveDate};
use log::debug;

/// Earliest date the feed is treated as having data for (`2020-01-01`).
pub fn epoch_min() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid epoch date")
}

/// Anchor of the window shown when no dates are supplied (`2025-09-24`).
pub fn default_anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 24).expect("valid default anchor date")
}

/// Tunable bounds for [`DateRangeNormalizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizerConfig {
    pub epoch_min: NaiveDate,
    pub default_anchor: NaiveDate,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            epoch_min: epoch_min(),
            default_anchor: default_anchor(),
        }
    }
}

/// Which supplied endpoint anchored a normalized window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    None,
    Start(NaiveDate),
    End(NaiveDate),
}

/// Converts optional start/end inputs into a clamped 9-day window.
#[derive(Debug, Clone)]
pub struct DateRangeNormalizer<C: Clock = SystemClock> {
    config: NormalizerConfig,
    clock: C,
}

impl DateRangeNormalizer<SystemClock> {
    /// Normalizer with default bounds reading the host clock.
    pub fn new() -> Self {
        Self::with_clock(NormalizerConfig::default(), SystemClock)
    }
}

impl Default for DateRangeNormalizer<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> DateRangeNormalizer<C> {
    pub fn with_clock(config: NormalizerConfig, clock: C) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> NormalizerConfig {
        self.config
    }

    /// Window shown when the caller supplies no dates.
    ///
    /// Constant across calls; not clamped against today.
    pub fn default_window(&self) -> DateWindow {
        let anchor = self.config.default_anchor;
        DateWindow::starting_at(anchor).unwrap_or(DateWindow::new(anchor, anchor))
    }

    /// Normalizes raw inputs into a window.
    ///
    /// # Contract
    /// - `(None, None)`: [`Self::default_window`].
    /// - `(Some(s), _)`: `start = clamp(s)`, `end = clamp(start + 8)`; a
    ///   supplied end is discarded.
    /// - `(None, Some(e))`: `end = clamp(e)`, `start = clamp(end - 8)`.
    pub fn normalize(&self, raw_start: Option<NaiveDate>, raw_end: Option<NaiveDate>) -> DateWindow {
        let anchor = match (raw_start, raw_end) {
            (None, None) => Anchor::None,
            (Some(start), _) => Anchor::Start(start),
            (None, Some(end)) => Anchor::End(end),
        };
        let span = Days::new(WINDOW_DAYS - 1);
        let today = self.clock.today();

        let window = match anchor {
            Anchor::None => self.default_window(),
            Anchor::Start(raw) => {
                let start = self.clamp(raw, today);
                let end = self.clamp(start.checked_add_days(span).unwrap_or(start), today);
                DateWindow::new(start, end)
            }
            Anchor::End(raw) => {
                let end = self.clamp(raw, today);
                let start = self.clamp(end.checked_sub_days(span).unwrap_or(end), today);
                DateWindow::new(start, end)
            }
        };

        if raw_start.is_some() && raw_end.is_some() {
            debug!(
                "event=window_normalize module=date_range status=ok end_overridden=true start={} end={}",
                window.start_iso(),
                window.end_iso()
            );
        }
        window
    }

    /// `max(epoch_min, min(date, today))`.
    fn clamp(&self, date: NaiveDate, today: NaiveDate) -> NaiveDate {
        date.min(today).max(self.config.epoch_min)
    }
}

/// Parses a raw calendar-date input.
///
/// Blank input means "not supplied"; malformed input is also `None`, the
/// same as an empty date control.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT).ok()
}
