//! Gallery query use-case.
//!
//! # Responsibility
//! - Turn raw date inputs into a window, fetch the feed and select entries.
//! - Drop results of queries that a newer query has superseded.
//!
//! # Invariants
//! - Every query gets a fresh [`FetchTicket`] before any I/O starts.
//! - Only the latest ticket's entries are reported as applied.

use crate::clock::{Clock, SystemClock};
use crate::feed::{select_window, FeedResult, FeedSource, FetchGate, FetchTicket};
use crate::model::entry::ApodEntry;
use crate::model::window::DateWindow;
use crate::service::date_range::DateRangeNormalizer;
use chrono::NaiveDate;
use log::info;

/// Query that has a ticket and a window but has not fetched yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingQuery {
    pub ticket: FetchTicket,
    pub window: DateWindow,
}

impl PendingQuery {
    /// Progress line shown while the fetch runs.
    pub fn status_line(&self) -> String {
        format!(
            "Fetching space images from {} to {}…",
            self.window.start_iso(),
            self.window.end_iso()
        )
    }
}

/// Result of a finished query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Latest query; `entries` should replace the gallery.
    Applied {
        window: DateWindow,
        entries: Vec<ApodEntry>,
    },
    /// A newer query started first; leave the gallery alone.
    Superseded { window: DateWindow },
}

impl QueryOutcome {
    pub fn window(&self) -> DateWindow {
        match self {
            Self::Applied { window, .. } | Self::Superseded { window } => *window,
        }
    }

    pub fn entries(&self) -> &[ApodEntry] {
        match self {
            Self::Applied { entries, .. } => entries,
            Self::Superseded { .. } => &[],
        }
    }

    pub fn status_line(&self) -> String {
        match self {
            Self::Applied { entries, .. } if entries.is_empty() => {
                "No APOD data available for the selected date range.".to_string()
            }
            Self::Applied { entries, .. } => {
                format!("Successfully loaded {} space image(s).", entries.len())
            }
            Self::Superseded { .. } => "A newer search replaced this one.".to_string(),
        }
    }
}

/// Gallery query service over a feed source.
pub struct Explorer<F: FeedSource, C: Clock = SystemClock> {
    normalizer: DateRangeNormalizer<C>,
    feed: F,
    gate: FetchGate,
}

impl<F: FeedSource, C: Clock> Explorer<F, C> {
    pub fn new(normalizer: DateRangeNormalizer<C>, feed: F) -> Self {
        Self {
            normalizer,
            feed,
            gate: FetchGate::new(),
        }
    }

    pub fn normalizer(&self) -> &DateRangeNormalizer<C> {
        &self.normalizer
    }

    /// Normalizes inputs and claims the newest ticket.
    pub fn begin_query(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> PendingQuery {
        let window = self.normalizer.normalize(start, end);
        let ticket = self.gate.begin();
        info!(
            "event=gallery_query module=explorer status=start generation={} start={} end={}",
            ticket.generation(),
            window.start_iso(),
            window.end_iso()
        );
        PendingQuery { ticket, window }
    }

    /// Fetches and selects entries for a pending query.
    ///
    /// # Errors
    /// - Returns feed errors unchanged; nothing is retried.
    pub fn run(&self, pending: PendingQuery) -> FeedResult<QueryOutcome> {
        let entries = select_window(self.feed.fetch_all()?, &pending.window);
        let outcome = match self.gate.settle(pending.ticket, entries) {
            Some(entries) => QueryOutcome::Applied {
                window: pending.window,
                entries,
            },
            None => QueryOutcome::Superseded {
                window: pending.window,
            },
        };
        info!(
            "event=gallery_query module=explorer status=ok generation={} applied={} entries={}",
            pending.ticket.generation(),
            matches!(outcome, QueryOutcome::Applied { .. }),
            outcome.entries().len()
        );
        Ok(outcome)
    }

    /// [`Self::begin_query`] followed by [`Self::run`].
    pub fn query(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> FeedResult<QueryOutcome> {
        let pending = self.begin_query(start, end);
        self.run(pending)
    }
}
