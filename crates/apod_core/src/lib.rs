//! Core logic for the APOD explorer.
//! Owns date-window normalization, feed selection and favorites persistence;
//! rendering and input gathering live in callers.

pub mod clock;
pub mod db;
pub mod feed;
pub mod logging;
pub mod media;
pub mod model;
pub mod repo;
pub mod service;
pub mod share;

pub use clock::{Clock, FixedClock, SystemClock};
pub use feed::{
    parse_feed, select_window, FeedError, FeedResult, FeedSource, FetchGate, FetchTicket,
    HttpFeedSource, StaticFeedSource, DEFAULT_FEED_URL, MAX_GALLERY_ITEMS,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use media::{detect_video, full_size_url, thumbnail_url, VideoEmbed, VideoProvider};
pub use model::entry::{ApodEntry, MediaType};
pub use model::favorite::{FavoriteItem, FavoriteKind};
pub use model::window::{DateWindow, WINDOW_DAYS};
pub use repo::slot_repo::{
    MemorySlotRepository, SlotError, SlotRepository, SlotResult, SqliteSlotRepository,
};
pub use service::date_range::{
    default_anchor, epoch_min, parse_calendar_date, DateRangeNormalizer, NormalizerConfig,
};
pub use service::explorer::{Explorer, PendingQuery, QueryOutcome};
pub use service::favorites::{
    load_favorites, FavoritesStore, Mutation, PersistStatus, ToggleOutcome, FAVORITES_SLOT,
};
pub use share::{download_target, share_link, share_text, SharePlatform};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
