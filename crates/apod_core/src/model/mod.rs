//! Domain records shared by the explorer services.
//!
//! # Responsibility
//! - Define the calendar window, feed entry and favorite shapes.
//! - Own the JSON wire names used by the feed and the favorites slot.
//!
//! # Invariants
//! - Calendar dates carry no time-of-day or timezone.
//! - A favorite's `id` is its only identity; other fields are display data.

pub mod entry;
pub mod favorite;
pub mod window;
