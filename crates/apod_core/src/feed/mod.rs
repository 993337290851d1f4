//! APOD feed access and window selection.
//!
//! # Responsibility
//! - Decode the static JSON feed into [`ApodEntry`] records.
//! - Pick the entries a gallery shows for one [`DateWindow`].
//! - Abstract the fetch behind [`FeedSource`] so services stay I/O-agnostic.
//!
//! # Invariants
//! - Selection never returns entries outside the window.
//! - Selection is ordered newest first and capped at [`MAX_GALLERY_ITEMS`].

pub mod gate;
pub mod http;

use crate::model::entry::ApodEntry;
use crate::model::window::DateWindow;
use chrono::NaiveDate;
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use gate::{FetchGate, FetchTicket};
pub use http::{HttpFeedSource, DEFAULT_FEED_URL};

/// Most entries a single gallery renders.
pub const MAX_GALLERY_ITEMS: usize = 9;

pub type FeedResult<T> = Result<T, FeedError>;

/// Feed transport and decoding failures.
#[derive(Debug)]
pub enum FeedError {
    Http(reqwest::Error),
    /// Server answered with a non-success status.
    Status { status: u16, body: String },
    Decode(serde_json::Error),
}

impl Display for FeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "APOD data fetch failed: {err}"),
            Self::Status { status, body } => {
                write!(f, "APOD data fetch failed ({status}): {body}")
            }
            Self::Decode(err) => write!(f, "APOD data is not a valid feed: {err}"),
        }
    }
}

impl Error for FeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Status { .. } => None,
            Self::Decode(err) => Some(err),
        }
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value)
    }
}

/// Capability to fetch every record the feed currently holds.
pub trait FeedSource {
    fn fetch_all(&self) -> FeedResult<Vec<ApodEntry>>;
}

impl<T: FeedSource + ?Sized> FeedSource for &T {
    fn fetch_all(&self) -> FeedResult<Vec<ApodEntry>> {
        (**self).fetch_all()
    }
}

/// Feed backed by records already in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticFeedSource {
    entries: Vec<ApodEntry>,
}

impl StaticFeedSource {
    pub fn new(entries: Vec<ApodEntry>) -> Self {
        Self { entries }
    }

    /// Builds a source from a feed document.
    pub fn from_json(json: &str) -> FeedResult<Self> {
        parse_feed(json).map(Self::new)
    }
}

impl FeedSource for StaticFeedSource {
    fn fetch_all(&self) -> FeedResult<Vec<ApodEntry>> {
        Ok(self.entries.clone())
    }
}

/// Decodes a feed document: a JSON array of entry objects.
///
/// A document that is not an array fails. Records that do not decode as
/// entries (no `date`, wrong types) are skipped.
pub fn parse_feed(json: &str) -> FeedResult<Vec<ApodEntry>> {
    let records: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let total = records.len();
    let entries: Vec<ApodEntry> = records
        .into_iter()
        .filter_map(|record| serde_json::from_value(record).ok())
        .collect();

    if entries.len() != total {
        warn!(
            "event=feed_parse module=feed status=ok total={total} skipped={}",
            total - entries.len()
        );
    }
    Ok(entries)
}

/// Entries inside `window`, newest first, at most [`MAX_GALLERY_ITEMS`].
///
/// Entries whose date does not parse are skipped.
pub fn select_window(entries: Vec<ApodEntry>, window: &DateWindow) -> Vec<ApodEntry> {
    let total = entries.len();
    let mut dated: Vec<(NaiveDate, ApodEntry)> = entries
        .into_iter()
        .filter_map(|entry| entry.calendar_date().map(|date| (date, entry)))
        .filter(|(date, _)| window.contains(*date))
        .collect();

    dated.sort_by(|(a, _), (b, _)| b.cmp(a));
    dated.truncate(MAX_GALLERY_ITEMS);

    debug!(
        "event=feed_select module=feed status=ok total={total} selected={} window_start={} window_end={}",
        dated.len(),
        window.start_iso(),
        window.end_iso()
    );
    dated.into_iter().map(|(_, entry)| entry).collect()
}
