//! SQLite store plumbing.
//!
//! Runtime defaults are intentionally conservative:
//! - `journal_mode = WAL` to allow concurrent readers while a writer commits
//! - `busy_timeout = 5s` to reduce transient lock failures under contention
//! - `foreign_keys = ON` to protect relational integrity
//!
//! Every mutating engine operation runs inside a single `BEGIN IMMEDIATE`
//! transaction opened on a connection configured here; the transaction
//! manager is the sole concurrency authority (no engine-level locks).

pub mod migrations;
pub mod schema;

use crate::error::{Error, Result};
use rusqlite::Connection;
use std::{path::Path, time::Duration};

/// Busy timeout used for store connections unless overridden by config.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open (or create) the store database, apply runtime pragmas, and migrate
/// the schema to the latest version.
///
/// # Errors
///
/// Returns [`Error::Io`] if the parent directory cannot be created and
/// [`Error::Store`] if opening, configuring, or migrating the database fails.
pub fn open_store(path: &Path, busy_timeout: Duration) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| Error::Io {
            context: format!("create store directory {}", parent.display()),
            source,
        })?;
    }

    let mut conn = Connection::open(path)?;

    configure_connection(&conn, busy_timeout)?;
    migrations::migrate(&mut conn)?;

    tracing::debug!(path = %path.display(), "opened store");
    Ok(conn)
}

/// Open the store only if the database file already exists.
///
/// Returns `Ok(None)` when the file is missing, so callers can surface a
/// "not initialized" error instead of silently creating an empty store.
///
/// # Errors
///
/// Same failure modes as [`open_store`].
pub fn try_open_store(path: &Path, busy_timeout: Duration) -> Result<Option<Connection>> {
    if !path.exists() {
        return Ok(None);
    }
    open_store(path, busy_timeout).map(Some)
}

/// Open a migrated in-memory store; used by tests and benchmarks.
///
/// # Errors
///
/// Returns [`Error::Store`] if configuring or migrating fails.
pub fn open_in_memory() -> Result<Connection> {
    let mut conn = Connection::open_in_memory()?;
    // WAL is meaningless for `:memory:`; the remaining pragmas still apply.
    conn.pragma_update(None, "foreign_keys", "ON")?;
    migrations::migrate(&mut conn)?;
    Ok(conn)
}

fn configure_connection(conn: &Connection, busy_timeout: Duration) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    let _journal_mode: String =
        conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    conn.busy_timeout(busy_timeout)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_BUSY_TIMEOUT, migrations, open_store, try_open_store};
    use tempfile::TempDir;

    fn temp_db_path() -> (TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("tack.db");
        (dir, path)
    }

    #[test]
    fn open_store_sets_wal_busy_timeout_and_fk() {
        let (_dir, path) = temp_db_path();
        let conn = open_store(&path, DEFAULT_BUSY_TIMEOUT).expect("open store");

        let journal_mode: String = conn
            .pragma_query_value(None, "journal_mode", |row| row.get(0))
            .expect("query journal_mode");
        assert_eq!(journal_mode.to_ascii_lowercase(), "wal");

        let busy_timeout_ms: u64 = conn
            .pragma_query_value(None, "busy_timeout", |row| row.get(0))
            .expect("query busy_timeout");
        assert_eq!(
            u128::from(busy_timeout_ms),
            DEFAULT_BUSY_TIMEOUT.as_millis()
        );

        let foreign_keys: i64 = conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .expect("query foreign_keys");
        assert_eq!(foreign_keys, 1);
    }

    #[test]
    fn open_store_runs_migrations() {
        let (_dir, path) = temp_db_path();
        let conn = open_store(&path, DEFAULT_BUSY_TIMEOUT).expect("open store");

        let version = migrations::current_schema_version(&conn).expect("schema version query");
        assert_eq!(version, migrations::LATEST_SCHEMA_VERSION);
    }

    #[test]
    fn try_open_is_none_for_missing_file() {
        let (_dir, path) = temp_db_path();
        let probe = try_open_store(&path, DEFAULT_BUSY_TIMEOUT).expect("probe");
        assert!(probe.is_none());

        drop(open_store(&path, DEFAULT_BUSY_TIMEOUT).expect("create store"));
        let probe = try_open_store(&path, DEFAULT_BUSY_TIMEOUT).expect("probe again");
        assert!(probe.is_some());
    }
}
