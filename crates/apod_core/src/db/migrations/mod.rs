//! Versioned schema migrations for the explorer database.
//!
//! # Responsibility
//! - Keep the ordered list of schema steps known to this binary.
//! - Bring an opened connection up to the latest schema in one transaction.
//!
//! # Invariants
//! - `version` values are strictly increasing.
//! - The applied version is recorded in `PRAGMA user_version`.
//! - A database stamped with a newer version is never touched.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_kv_slots.sql"),
}];

/// Returns the newest schema version this binary can write.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies every migration newer than the connection's `user_version`.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let stored = stored_version(conn)?;
    let latest = latest_version();

    if stored > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: stored,
            latest_supported: latest,
        });
    }
    if stored == latest {
        return Ok(());
    }

    let pending: Vec<&Migration> = MIGRATIONS.iter().filter(|m| m.version > stored).collect();
    let tx = conn.transaction()?;
    for migration in &pending {
        tx.execute_batch(migration.sql)?;
        tx.pragma_update(None, "user_version", migration.version)?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={stored} to_version={latest} applied={}",
        pending.len()
    );
    Ok(())
}

fn stored_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?)
}
