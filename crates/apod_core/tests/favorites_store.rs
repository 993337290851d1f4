use apod_core::db::open_db;
use apod_core::{
    FavoriteItem, FavoriteKind, FavoritesStore, FixedClock, MemorySlotRepository, PersistStatus,
    SlotError, SlotRepository, SlotResult, SqliteSlotRepository, FAVORITES_SLOT,
};
use chrono::NaiveDate;
use std::cell::Cell;

const NOW_MS: i64 = 1_759_300_000_000;

fn clock() -> FixedClock {
    FixedClock::new(NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(), NOW_MS)
}

fn apod(id: &str) -> FavoriteItem {
    FavoriteItem::new(
        id,
        FavoriteKind::Apod,
        format!("Picture for {id}"),
        id,
        format!("https://apod.example/{id}.jpg"),
    )
}

fn slot_json(repo: &impl SlotRepository) -> serde_json::Value {
    let raw = repo.get_slot(FAVORITES_SLOT).unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn ids<R: SlotRepository>(store: &FavoritesStore<R, FixedClock>) -> Vec<String> {
    store.items().iter().map(|item| item.id.clone()).collect()
}

/// Slot store whose writes can be switched off.
#[derive(Default)]
struct FlakyRepo {
    inner: MemorySlotRepository,
    reject_writes: Cell<bool>,
}

impl SlotRepository for FlakyRepo {
    fn get_slot(&self, key: &str) -> SlotResult<Option<String>> {
        self.inner.get_slot(key)
    }

    fn put_slot(&self, key: &str, value: &str) -> SlotResult<()> {
        if self.reject_writes.get() {
            return Err(SlotError::Unavailable("quota exceeded".to_string()));
        }
        self.inner.put_slot(key, value)
    }

    fn delete_slot(&self, key: &str) -> SlotResult<()> {
        self.inner.delete_slot(key)
    }
}

#[test]
fn add_then_remove_mirrors_slot() {
    let repo = MemorySlotRepository::new();
    let mut store = FavoritesStore::with_clock(&repo, clock());
    assert!(store.is_empty());

    let added = store.add(apod("2025-10-01"));
    assert!(added.applied);
    assert_eq!(added.persist, PersistStatus::Saved);
    assert!(store.is_favorite("2025-10-01"));

    let persisted = slot_json(&repo);
    assert_eq!(persisted.as_array().unwrap().len(), 1);
    assert_eq!(persisted[0]["id"], "2025-10-01");
    assert_eq!(persisted[0]["imageUrl"], "https://apod.example/2025-10-01.jpg");
    assert_eq!(persisted[0]["kind"], "apod");
    assert_eq!(persisted[0]["favoritedAt"], NOW_MS);

    let removed = store.remove("2025-10-01");
    assert!(removed.applied);
    assert!(!store.is_favorite("2025-10-01"));
    assert_eq!(slot_json(&repo), serde_json::json!([]));
}

#[test]
fn toggle_twice_returns_true_then_false() {
    let repo = MemorySlotRepository::new();
    let mut store = FavoritesStore::with_clock(&repo, clock());

    assert!(store.toggle(apod("2025-09-28")).is_favorite);
    let second = store.toggle(apod("2025-09-28"));
    assert!(!second.is_favorite);
    assert_eq!(second.persist, PersistStatus::Saved);
    assert!(!store.is_favorite("2025-09-28"));
}

#[test]
fn duplicate_add_is_a_no_op() {
    let repo = MemorySlotRepository::new();
    let mut store = FavoritesStore::with_clock(&repo, clock());

    assert!(store.add(apod("2025-09-30")).applied);
    let again = store.add(apod("2025-09-30"));
    assert!(!again.applied);
    assert_eq!(again.persist, PersistStatus::Unchanged);
    assert_eq!(store.len(), 1);
}

#[test]
fn remove_missing_id_reports_false() {
    let repo = MemorySlotRepository::new();
    let mut store = FavoritesStore::with_clock(&repo, clock());

    let outcome = store.remove("1999-01-01");
    assert!(!outcome.applied);
    assert_eq!(outcome.persist, PersistStatus::Unchanged);
    assert_eq!(repo.get_slot(FAVORITES_SLOT).unwrap(), None);
}

#[test]
fn newest_favorite_comes_first() {
    let repo = MemorySlotRepository::new();
    let mut store = FavoritesStore::with_clock(&repo, clock());

    store.add(apod("2025-09-24"));
    store.add(apod("2025-09-25"));
    store.add(apod("2025-09-26"));

    assert_eq!(ids(&store), vec!["2025-09-26", "2025-09-25", "2025-09-24"]);
}

#[test]
fn fresh_store_reloads_same_order() {
    let repo = MemorySlotRepository::new();
    {
        let mut store = FavoritesStore::with_clock(&repo, clock());
        store.add(apod("a"));
        store.add(apod("b"));
        store.add(apod("c"));
        store.remove("b");
        store.add(apod("d"));
    }

    let reloaded = FavoritesStore::with_clock(&repo, clock());
    assert_eq!(ids(&reloaded), vec!["d", "c", "a"]);
}

#[test]
fn refavoriting_restamps_and_moves_to_front() {
    let repo = MemorySlotRepository::new();
    let mut store = FavoritesStore::with_clock(&repo, clock());
    store.add(apod("x"));
    store.add(apod("y"));
    store.remove("x");
    drop(store);

    let later = FixedClock::new(NaiveDate::from_ymd_opt(2025, 10, 2).unwrap(), NOW_MS + 5_000);
    let mut store = FavoritesStore::with_clock(&repo, later);
    store.add(apod("x"));

    assert_eq!(ids(&store), vec!["x", "y"]);
    assert_eq!(store.get("x").unwrap().favorited_at, NOW_MS + 5_000);
    assert_eq!(store.get("y").unwrap().favorited_at, NOW_MS);
}

#[test]
fn clear_persists_empty_list() {
    let repo = MemorySlotRepository::new();
    let mut store = FavoritesStore::with_clock(&repo, clock());
    store.add(apod("a"));
    store.add(apod("b"));

    assert_eq!(store.clear(), PersistStatus::Saved);
    assert!(store.is_empty());
    assert_eq!(slot_json(&repo), serde_json::json!([]));
}

#[test]
fn corrupt_slot_loads_empty() {
    let repo = MemorySlotRepository::new().with_slot(FAVORITES_SLOT, "{not json");
    let store = FavoritesStore::with_clock(&repo, clock());
    assert!(store.is_empty());

    let repo = MemorySlotRepository::new().with_slot(FAVORITES_SLOT, r#"{"id":"x"}"#);
    let store = FavoritesStore::with_clock(&repo, clock());
    assert!(store.is_empty());
}

#[test]
fn duplicate_ids_in_slot_keep_first_entry() {
    let raw = r#"[
        {"id":"a","title":"newest a","date":"2025-01-01","imageUrl":"u1","kind":"apod","favoritedAt":3},
        {"id":"b","title":"b","date":"2025-01-02","imageUrl":"u2","kind":"mars","favoritedAt":2},
        {"id":"a","title":"older a","date":"2025-01-01","imageUrl":"u1","kind":"apod","favoritedAt":1}
    ]"#;
    let repo = MemorySlotRepository::new().with_slot(FAVORITES_SLOT, raw);
    let store = FavoritesStore::with_clock(&repo, clock());

    assert_eq!(ids(&store), vec!["a", "b"]);
    assert_eq!(store.get("a").unwrap().title, "newest a");
    assert_eq!(store.get("b").unwrap().kind, FavoriteKind::Mars);
}

#[test]
fn failed_write_keeps_memory_and_reports_failure() {
    let repo = FlakyRepo::default();
    let mut store = FavoritesStore::with_clock(&repo, clock());
    store.add(apod("kept"));

    repo.reject_writes.set(true);
    let outcome = store.add(apod("memory-only"));
    assert!(outcome.applied);
    assert!(outcome.persist.is_failed());
    match &outcome.persist {
        PersistStatus::Failed(reason) => assert!(reason.contains("quota exceeded")),
        other => panic!("unexpected persist status: {other:?}"),
    }
    assert!(store.is_favorite("memory-only"));

    let reloaded = FavoritesStore::with_clock(&repo, clock());
    assert_eq!(ids(&reloaded), vec!["kept"]);
}

#[test]
fn export_snapshot_matches_slot_contents() {
    let repo = MemorySlotRepository::new();
    let mut store = FavoritesStore::with_clock(&repo, clock());
    store.add(apod("a"));
    store.add(FavoriteItem::new("iss-1", FavoriteKind::Mission, "ISS", "2025-09-01", "u"));

    let snapshot = store.export_snapshot().unwrap();
    assert_eq!(Some(snapshot), repo.get_slot(FAVORITES_SLOT).unwrap());
}

#[test]
fn sqlite_slot_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("explorer.db");

    {
        let conn = open_db(&path).unwrap();
        let mut store = FavoritesStore::with_clock(SqliteSlotRepository::new(&conn), clock());
        store.add(apod("2025-09-24"));
        store.add(apod("2025-09-25"));
    }

    let conn = open_db(&path).unwrap();
    let store = FavoritesStore::with_clock(SqliteSlotRepository::new(&conn), clock());
    assert_eq!(ids(&store), vec!["2025-09-25", "2025-09-24"]);
}
