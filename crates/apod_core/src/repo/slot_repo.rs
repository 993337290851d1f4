//! Slot repository contract with SQLite and in-memory implementations.
//!
//! # Responsibility
//! - Store opaque UTF-8 strings under stable string keys.
//! - Surface storage failures as typed errors so callers can decide policy.
//!
//! # Invariants
//! - `put_slot` is an upsert of the full value.
//! - `delete_slot` on a missing key is a no-op.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SlotResult<T> = Result<T, SlotError>;

/// Failure reading or writing a slot.
#[derive(Debug)]
pub enum SlotError {
    Db(DbError),
    /// Backend refused the operation (read-only, quota, detached, ...).
    Unavailable(String),
}

impl Display for SlotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(reason) => write!(f, "slot store unavailable: {reason}"),
        }
    }
}

impl Error for SlotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for SlotError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SlotError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Generic string-keyed persistent store.
pub trait SlotRepository {
    fn get_slot(&self, key: &str) -> SlotResult<Option<String>>;
    fn put_slot(&self, key: &str, value: &str) -> SlotResult<()>;
    fn delete_slot(&self, key: &str) -> SlotResult<()>;
}

impl<T: SlotRepository + ?Sized> SlotRepository for &T {
    fn get_slot(&self, key: &str) -> SlotResult<Option<String>> {
        (**self).get_slot(key)
    }

    fn put_slot(&self, key: &str, value: &str) -> SlotResult<()> {
        (**self).put_slot(key, value)
    }

    fn delete_slot(&self, key: &str) -> SlotResult<()> {
        (**self).delete_slot(key)
    }
}

/// SQLite-backed slots stored in the `kv_slots` table.
///
/// Expects a connection returned by [`crate::db::open_db`] or
/// [`crate::db::open_db_in_memory`].
pub struct SqliteSlotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SlotRepository for SqliteSlotRepository<'_> {
    fn get_slot(&self, key: &str) -> SlotResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT slot_value FROM kv_slots WHERE slot_key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put_slot(&self, key: &str, value: &str) -> SlotResult<()> {
        self.conn.execute(
            "INSERT INTO kv_slots (slot_key, slot_value) VALUES (?1, ?2)
             ON CONFLICT(slot_key) DO UPDATE SET
                slot_value = excluded.slot_value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete_slot(&self, key: &str) -> SlotResult<()> {
        self.conn
            .execute("DELETE FROM kv_slots WHERE slot_key = ?1;", [key])?;
        Ok(())
    }
}

/// Process-local slots, lost on drop.
///
/// Single-threaded by construction (`RefCell`), matching the event-driven
/// callers it backs.
#[derive(Debug, Default)]
pub struct MemorySlotRepository {
    slots: RefCell<HashMap<String, String>>,
}

impl MemorySlotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a slot, bypassing any service-level encoding.
    pub fn with_slot(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots.borrow_mut().insert(key.into(), value.into());
        self
    }
}

impl SlotRepository for MemorySlotRepository {
    fn get_slot(&self, key: &str) -> SlotResult<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn put_slot(&self, key: &str, value: &str) -> SlotResult<()> {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete_slot(&self, key: &str) -> SlotResult<()> {
        self.slots.borrow_mut().remove(key);
        Ok(())
    }
}
