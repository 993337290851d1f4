//! Share intents and download naming for a single entry.

use crate::media;
use crate::model::entry::{ApodEntry, MediaType};

/// Destination of a share action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharePlatform {
    Twitter,
    Facebook,
    /// Plain text for the clipboard.
    Copy,
}

/// Message attached to every share.
pub fn share_text(entry: &ApodEntry) -> String {
    format!(
        "Check out this amazing space image: \"{}\" from NASA's Astronomy Picture of the Day!",
        entry.title
    )
}

/// Share URL (or clipboard text for [`SharePlatform::Copy`]) for `entry`.
///
/// `page_url` is the page being shared, not the media URL.
pub fn share_link(platform: SharePlatform, entry: &ApodEntry, page_url: &str) -> String {
    let text = share_text(entry);
    match platform {
        SharePlatform::Twitter => format!(
            "https://twitter.com/intent/tweet?text={}&url={}",
            urlencoding::encode(&text),
            urlencoding::encode(page_url)
        ),
        SharePlatform::Facebook => format!(
            "https://www.facebook.com/sharer/sharer.php?u={}",
            urlencoding::encode(page_url)
        ),
        SharePlatform::Copy => format!("{text}\n{page_url}"),
    }
}

/// Suggested file name and source URL for downloading the entry's image.
///
/// Only images are downloadable; videos and other media return `None`.
pub fn download_target(entry: &ApodEntry) -> Option<(String, String)> {
    if entry.media_type != MediaType::Image {
        return None;
    }
    Some((
        format!("NASA_APOD_{}.jpg", entry.date),
        media::full_size_url(entry).to_string(),
    ))
}
