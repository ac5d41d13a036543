//! High-level operation contract over the SQLite store.
//!
//! [`Store`] owns one connection. Every mutating operation is exactly one
//! `BEGIN IMMEDIATE` transaction: the write lock is taken up front, the
//! current ranks are read, the minimal shifts and the row update are issued,
//! and the whole thing commits or rolls back as a unit. No operation spans
//! more than one transaction and nothing slow runs inside one.

mod boards;
mod cards;

use crate::db;
use crate::error::{Error, Result};
use crate::model::{Board, Card, Lane, Priority};
use crate::verify::{self, RankViolation};
use rusqlite::{Connection, Row, Transaction, TransactionBehavior, types::Type};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Connection tuning for [`Store::open_with`].
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// How long a writer waits on a held lock before the operation surfaces
    /// [`Error::Conflict`].
    pub busy_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            busy_timeout: db::DEFAULT_BUSY_TIMEOUT,
        }
    }
}

/// Handle to one open tack store.
///
/// A `Store` is cheap to open and single-connection; concurrent callers each
/// open their own and let SQLite's transaction manager arbitrate.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the store at `path` with default options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] or [`Error::Store`] if the database cannot be
    /// created, configured, or migrated.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with(path, &StoreOptions::default())
    }

    /// Open (or create) the store at `path`.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Store::open`].
    pub fn open_with(path: &Path, options: &StoreOptions) -> Result<Self> {
        let conn = db::open_store(path, options.busy_timeout)?;
        Ok(Self { conn })
    }

    /// Open the store only if it already exists; `Ok(None)` otherwise.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Store::open`].
    pub fn try_open(path: &Path, options: &StoreOptions) -> Result<Option<Self>> {
        Ok(db::try_open_store(path, options.busy_timeout)?.map(|conn| Self { conn }))
    }

    /// Open a fresh in-memory store; used by tests and benchmarks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if migration fails.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: db::open_in_memory()?,
        })
    }

    /// Rank-contiguity audit over every partition in the store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the audit queries fail.
    pub fn audit(&self) -> Result<Vec<RankViolation>> {
        verify::audit(&self.conn)
    }

    /// One write transaction with the lock taken up front, so rank snapshots
    /// read inside it cannot go stale under a concurrent writer.
    fn write_tx(&mut self) -> Result<Transaction<'_>> {
        self.conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(Error::from)
    }
}

pub(crate) fn now_us() -> i64 {
    chrono::Utc::now().timestamp_micros()
}

pub(crate) const CARD_COLUMNS: &str = "card_id, board_id, lane, rank, title, body, priority, \
     due_at_us, assignee, is_deleted, deleted_at_us, created_at_us, updated_at_us";

pub(crate) const BOARD_COLUMNS: &str =
    "board_id, name, rank, is_deleted, deleted_at_us, created_at_us, updated_at_us";

/// Map a `SELECT {CARD_COLUMNS}` row. Persisted enum strings are re-parsed
/// through the closed enums; a mismatch surfaces as [`Error::Corrupt`] at the
/// API boundary.
pub(crate) fn card_from_row(row: &Row<'_>) -> rusqlite::Result<Card> {
    let lane_raw: String = row.get("lane")?;
    let lane = Lane::from_str(&lane_raw)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(err)))?;
    let priority_raw: String = row.get("priority")?;
    let priority = Priority::from_str(&priority_raw)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(err)))?;

    Ok(Card {
        id: row.get("card_id")?,
        board_id: row.get("board_id")?,
        lane,
        rank: row.get("rank")?,
        title: row.get("title")?,
        body: row.get("body")?,
        priority,
        due_at_us: row.get("due_at_us")?,
        assignee: row.get("assignee")?,
        is_deleted: row.get("is_deleted")?,
        deleted_at_us: row.get("deleted_at_us")?,
        created_at_us: row.get("created_at_us")?,
        updated_at_us: row.get("updated_at_us")?,
    })
}

pub(crate) fn board_from_row(row: &Row<'_>) -> rusqlite::Result<Board> {
    Ok(Board {
        id: row.get("board_id")?,
        name: row.get("name")?,
        rank: row.get("rank")?,
        is_deleted: row.get("is_deleted")?,
        deleted_at_us: row.get("deleted_at_us")?,
        created_at_us: row.get("created_at_us")?,
        updated_at_us: row.get("updated_at_us")?,
    })
}
