//! APOD feed record.
//!
//! # Invariants
//! - `date` is kept as the raw feed string; [`ApodEntry::calendar_date`]
//!   is the only place it is interpreted.
//! - Unknown feed fields are ignored on decode.
//! - `null` text fields decode as empty strings.

use crate::model::window::ISO_DATE_FORMAT;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Media kind advertised by the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    #[default]
    Image,
    Video,
    /// Anything the feed adds later (`other`, `gif`, ...).
    #[serde(other)]
    Other,
}

/// One Astronomy Picture of the Day record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApodEntry {
    /// Publication date, `YYYY-MM-DD`.
    pub date: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub explanation: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    /// High-resolution image, images only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hdurl: Option<String>,
    #[serde(default)]
    pub media_type: MediaType,
    /// Poster frame for videos, when the feed provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
}

impl ApodEntry {
    /// Parses the feed date; `None` for malformed values.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), ISO_DATE_FORMAT).ok()
    }

    pub fn is_video(&self) -> bool {
        self.media_type == MediaType::Video
    }

    /// Title for display, with the feed's generic fallback.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Astronomy Picture of the Day"
        } else {
            self.title.as_str()
        }
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
