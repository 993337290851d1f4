//! Favorites use-case service.
//!
//! # Responsibility
//! - Keep the ordered, deduplicated favorites list for one user.
//! - Mirror the list into the `nasa-favorites` slot after every mutation.
//!
//! # Invariants
//! - No two entries share an `id`.
//! - Order is most-recently-favorited first.
//! - Every mutating call writes the full list before returning.
//! - A failed write never rolls back memory; the in-memory list stays
//!   authoritative and the failure is reported in the call's outcome.
//! - Missing or corrupt persisted data loads as an empty list.

use crate::clock::{Clock, SystemClock};
use crate::model::favorite::FavoriteItem;
use crate::repo::slot_repo::SlotRepository;
use log::{error, info, warn};
use std::collections::HashSet;

/// Slot holding the JSON-encoded favorites list.
pub const FAVORITES_SLOT: &str = "nasa-favorites";

/// Result of mirroring the in-memory list into the slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistStatus {
    /// Nothing changed, so nothing was written.
    Unchanged,
    Saved,
    /// Write failed; memory still holds the new state.
    Failed(String),
}

impl PersistStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Outcome of `add` / `remove`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    /// Whether the list changed.
    pub applied: bool,
    pub persist: PersistStatus,
}

/// Outcome of `toggle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// Membership after the toggle.
    pub is_favorite: bool,
    pub persist: PersistStatus,
}

/// Persisted favorites collection with toggle semantics.
pub struct FavoritesStore<R: SlotRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
    items: Vec<FavoriteItem>,
}

impl<R: SlotRepository> FavoritesStore<R, SystemClock> {
    /// Opens the store over `repo`, loading the persisted list once.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<R: SlotRepository, C: Clock> FavoritesStore<R, C> {
    pub fn with_clock(repo: R, clock: C) -> Self {
        let items = load_favorites(&repo);
        Self { repo, clock, items }
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&FavoriteItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Favorites, most recent first.
    pub fn items(&self) -> &[FavoriteItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds `item` at the front, stamping `favorited_at` with the clock.
    ///
    /// Returns `applied = false` without writing when the id is present.
    pub fn add(&mut self, item: FavoriteItem) -> Mutation {
        if self.is_favorite(&item.id) {
            return Mutation {
                applied: false,
                persist: PersistStatus::Unchanged,
            };
        }

        let mut item = item;
        item.favorited_at = self.clock.now_epoch_ms();
        info!(
            "event=favorite_add module=favorites status=ok kind={:?} count={}",
            item.kind,
            self.items.len() + 1
        );
        self.items.insert(0, item);

        Mutation {
            applied: true,
            persist: self.persist(),
        }
    }

    /// Removes the entry with `id`, if any.
    pub fn remove(&mut self, id: &str) -> Mutation {
        let Some(index) = self.position(id) else {
            return Mutation {
                applied: false,
                persist: PersistStatus::Unchanged,
            };
        };

        self.items.remove(index);
        info!(
            "event=favorite_remove module=favorites status=ok count={}",
            self.items.len()
        );

        Mutation {
            applied: true,
            persist: self.persist(),
        }
    }

    /// Removes `item` when present, otherwise adds it.
    pub fn toggle(&mut self, item: FavoriteItem) -> ToggleOutcome {
        if self.is_favorite(&item.id) {
            let mutation = self.remove(&item.id);
            ToggleOutcome {
                is_favorite: false,
                persist: mutation.persist,
            }
        } else {
            let mutation = self.add(item);
            ToggleOutcome {
                is_favorite: true,
                persist: mutation.persist,
            }
        }
    }

    /// Drops every favorite and persists the empty list. No undo.
    pub fn clear(&mut self) -> PersistStatus {
        let dropped = self.items.len();
        self.items.clear();
        info!("event=favorites_clear module=favorites status=ok dropped={dropped}");
        self.persist()
    }

    /// Serializes the list in the persisted slot format.
    pub fn export_snapshot(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.items)
    }

    /// Gives back the underlying repository.
    pub fn into_repo(self) -> R {
        self.repo
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    fn persist(&self) -> PersistStatus {
        let encoded = match self.export_snapshot() {
            Ok(encoded) => encoded,
            Err(err) => {
                error!(
                    "event=favorites_persist module=favorites status=error error_code=encode_failed error={err}"
                );
                return PersistStatus::Failed(format!("encode favorites: {err}"));
            }
        };

        match self.repo.put_slot(FAVORITES_SLOT, &encoded) {
            Ok(()) => PersistStatus::Saved,
            Err(err) => {
                error!(
                    "event=favorites_persist module=favorites status=error error_code=write_failed count={} error={err}",
                    self.items.len()
                );
                PersistStatus::Failed(err.to_string())
            }
        }
    }
}

/// Reads the favorites slot.
///
/// Never fails: read errors, a missing slot and undecodable JSON all yield
/// an empty list. Duplicate ids keep their first (most recent) occurrence.
pub fn load_favorites<R: SlotRepository + ?Sized>(repo: &R) -> Vec<FavoriteItem> {
    let raw = match repo.get_slot(FAVORITES_SLOT) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!(
                "event=favorites_load module=favorites status=error error_code=read_failed error={err}"
            );
            return Vec::new();
        }
    };

    let decoded: Vec<FavoriteItem> = match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(err) => {
            warn!(
                "event=favorites_load module=favorites status=error error_code=decode_failed bytes={} error={err}",
                raw.len()
            );
            return Vec::new();
        }
    };

    let decoded_count = decoded.len();
    let mut seen = HashSet::with_capacity(decoded_count);
    let items: Vec<FavoriteItem> = decoded
        .into_iter()
        .filter(|item| seen.insert(item.id.clone()))
        .collect();

    if items.len() != decoded_count {
        warn!(
            "event=favorites_load module=favorites status=ok duplicates_dropped={}",
            decoded_count - items.len()
        );
    }
    info!(
        "event=favorites_load module=favorites status=ok count={}",
        items.len()
    );
    items
}
