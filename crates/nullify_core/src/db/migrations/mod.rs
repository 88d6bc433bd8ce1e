//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register schema migrations in strictly increasing order.
//! - Apply pending migrations atomically.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - `PRAGMA user_version` mirrors the latest applied migration.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_records.sql"),
}];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations on the provided connection.
///
/// Pending migrations run inside one transaction; `user_version` is
/// advanced to the latest version only when all of them succeed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let applied = current_user_version(conn)?;
    let latest = latest_version();

    if applied > latest {
        return Err(DbError::SchemaVersionAhead {
            db_version: applied,
            supported: latest,
        });
    }

    let pending = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > applied);

    let mut ran_any = false;
    let tx = conn.transaction()?;
    for migration in pending {
        tx.execute_batch(migration.sql)?;
        ran_any = true;
    }
    if ran_any {
        tx.execute_batch(&format!("PRAGMA user_version = {latest};"))?;
    }
    tx.commit()?;

    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
