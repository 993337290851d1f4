//! Media URL helpers for gallery cards and the lightbox.
//!
//! # Responsibility
//! - Recognize embeddable video providers from an entry URL.
//! - Choose thumbnail and full-size URLs for an entry.
//!
//! # Invariants
//! - Provider checks run in a fixed order: YouTube, Vimeo, Dailymotion.
//! - An unrecognized URL is never an error; callers fall back to a link.

use crate::model::entry::ApodEntry;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

static YOUTUBE_HOST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"youtube\.com|youtu\.be").expect("valid youtube host regex"));
static YOUTUBE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})").expect("valid youtube id regex"));
static VIMEO_HOST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"vimeo\.com").expect("valid vimeo host regex"));
static VIMEO_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"vimeo\.com/(\d+)").expect("valid vimeo id regex"));
static DAILYMOTION_HOST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"dailymotion\.com").expect("valid dailymotion host regex"));
static DAILYMOTION_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"dailymotion\.com(?:/video)?/([a-zA-Z0-9]+)").expect("valid dailymotion id regex")
});

/// Video host with a known embed player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoProvider {
    YouTube,
    Vimeo,
    Dailymotion,
}

impl VideoProvider {
    pub fn label(self) -> &'static str {
        match self {
            Self::YouTube => "YouTube",
            Self::Vimeo => "Vimeo",
            Self::Dailymotion => "Dailymotion",
        }
    }

    fn embed_url(self, video_id: &str) -> String {
        match self {
            Self::YouTube => {
                format!("https://www.youtube.com/embed/{video_id}?rel=0&modestbranding=1")
            }
            Self::Vimeo => {
                format!("https://player.vimeo.com/video/{video_id}?title=0&byline=0&portrait=0")
            }
            Self::Dailymotion => format!("https://www.dailymotion.com/embed/video/{video_id}"),
        }
    }
}

impl Display for VideoProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Player URL for an embeddable video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEmbed {
    pub provider: VideoProvider,
    /// Provider video id; empty when the host matched but no id was found.
    pub video_id: String,
    pub embed_url: String,
}

/// Detects the video provider of `url` and builds its embed URL.
///
/// A recognized host without a parsable id still yields an embed with an
/// empty id, matching how the player pages degrade.
pub fn detect_video(url: &str) -> Option<VideoEmbed> {
    let (provider, id_re) = if YOUTUBE_HOST_RE.is_match(url) {
        (VideoProvider::YouTube, &*YOUTUBE_ID_RE)
    } else if VIMEO_HOST_RE.is_match(url) {
        (VideoProvider::Vimeo, &*VIMEO_ID_RE)
    } else if DAILYMOTION_HOST_RE.is_match(url) {
        (VideoProvider::Dailymotion, &*DAILYMOTION_ID_RE)
    } else {
        return None;
    };

    let video_id = id_re
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    Some(VideoEmbed {
        provider,
        embed_url: provider.embed_url(&video_id),
        video_id,
    })
}

/// Image shown on a gallery card.
pub fn thumbnail_url(entry: &ApodEntry) -> String {
    if entry.is_video() {
        entry
            .thumbnail_url
            .clone()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| entry.url.clone())
    } else {
        entry.url.clone()
    }
}

/// Image shown in the lightbox: `hdurl`, falling back to `url`.
pub fn full_size_url(entry: &ApodEntry) -> &str {
    entry
        .hdurl
        .as_deref()
        .filter(|url| !url.is_empty())
        .unwrap_or(entry.url.as_str())
}
