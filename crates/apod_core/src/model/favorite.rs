//! Favorite record persisted in the favorites slot.
//!
//! # Invariants
//! - `id` is the identity; two favorites with equal ids are the same item.
//! - `favorited_at` is stamped by the store, never trusted from callers.

use crate::media;
use crate::model::entry::ApodEntry;
use serde::{Deserialize, Serialize};

/// Source catalogue a favorite came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteKind {
    Apod,
    Mars,
    Mission,
}

/// Favorited item, serialized with the slot's camelCase field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteItem {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// ISO calendar date of the underlying item.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub image_url: String,
    pub kind: FavoriteKind,
    /// Unix epoch milliseconds.
    #[serde(default)]
    pub favorited_at: i64,
}

impl FavoriteItem {
    /// Creates an unstamped favorite with an explicit id.
    pub fn new(
        id: impl Into<String>,
        kind: FavoriteKind,
        title: impl Into<String>,
        date: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            date: date.into(),
            image_url: image_url.into(),
            kind,
            favorited_at: 0,
        }
    }

    /// Favorite for a feed entry, keyed by its publication date.
    pub fn from_entry(entry: &ApodEntry) -> Self {
        Self::new(
            entry.date.clone(),
            FavoriteKind::Apod,
            entry.display_title(),
            entry.date.clone(),
            media::thumbnail_url(entry),
        )
    }
}
