//! Generic ranked-partition primitives.
//!
//! Cards (partitioned by board + lane) and boards (one global partition) share
//! the same density rules, so the shift algebra is written once against the
//! [`Partition`] trait and instantiated per table.
//!
//! Invariant maintained by these primitives, given callers compose them inside
//! one transaction: the live ranks of every partition are exactly
//! `{0, 1, ..., n-1}`. Each primitive shifts only the minimal contiguous span
//! it has to, so cost is proportional to the distance moved rather than the
//! partition size.
//!
//! All functions expect to run inside the caller's transaction; none of them
//! commit, and none of them touch rows outside the given scope.

use crate::model::{BoardScope, CardScope};
use rusqlite::{Connection, params_from_iter, types::Value};
use std::cmp::Ordering;
use std::fmt;

/// A scope within which ranks must stay dense and unique.
///
/// `SCOPE_SQL` is a `WHERE` fragment selecting the partition's rows, with one
/// `?` placeholder per element of [`Partition::scope_params`]. Liveness
/// (`is_deleted = 0`) is appended by the primitives, not by the scope.
pub trait Partition: Clone + PartialEq + fmt::Debug {
    /// Table holding the ranked rows.
    const TABLE: &'static str;
    /// Primary-key column of [`Self::TABLE`].
    const ID_COLUMN: &'static str;
    /// Partition-membership predicate with `?` placeholders.
    const SCOPE_SQL: &'static str;

    /// Values bound to the `?` placeholders of [`Self::SCOPE_SQL`], in order.
    fn scope_params(&self) -> Vec<Value>;
}

impl Partition for CardScope {
    const TABLE: &'static str = "cards";
    const ID_COLUMN: &'static str = "card_id";
    // `IS` instead of `=` so unfiled cards (NULL board) form a partition too.
    const SCOPE_SQL: &'static str = "board_id IS ? AND lane = ?";

    fn scope_params(&self) -> Vec<Value> {
        let board = match &self.board {
            Some(id) => Value::Text(id.clone()),
            None => Value::Null,
        };
        vec![board, Value::Text(self.lane.to_string())]
    }
}

impl Partition for BoardScope {
    const TABLE: &'static str = "boards";
    const ID_COLUMN: &'static str = "board_id";
    const SCOPE_SQL: &'static str = "1 = 1";

    fn scope_params(&self) -> Vec<Value> {
        Vec::new()
    }
}

/// Number of live rows in the partition.
pub(crate) fn live_len<P: Partition>(conn: &Connection, scope: &P) -> rusqlite::Result<i64> {
    let sql = format!(
        "SELECT COUNT(*) FROM {table} WHERE {scope} AND is_deleted = 0",
        table = P::TABLE,
        scope = P::SCOPE_SQL,
    );
    conn.query_row(&sql, params_from_iter(scope.scope_params()), |row| {
        row.get(0)
    })
}

/// Rank for a row appended at the partition tail: `max(rank) + 1`, or 0.
pub(crate) fn next_rank<P: Partition>(conn: &Connection, scope: &P) -> rusqlite::Result<i64> {
    let sql = format!(
        "SELECT COALESCE(MAX(rank) + 1, 0) FROM {table} WHERE {scope} AND is_deleted = 0",
        table = P::TABLE,
        scope = P::SCOPE_SQL,
    );
    conn.query_row(&sql, params_from_iter(scope.scope_params()), |row| {
        row.get(0)
    })
}

/// Close the gap left by removing a row from `removed_rank`: every live row
/// above it shifts down by one. Returns the number of rows shifted.
pub(crate) fn close_gap<P: Partition>(
    conn: &Connection,
    scope: &P,
    removed_rank: i64,
) -> rusqlite::Result<usize> {
    let sql = format!(
        "UPDATE {table} SET rank = rank - 1
         WHERE {scope} AND is_deleted = 0 AND rank > ?",
        table = P::TABLE,
        scope = P::SCOPE_SQL,
    );
    let mut params = scope.scope_params();
    params.push(Value::Integer(removed_rank));
    conn.execute(&sql, params_from_iter(params))
}

/// Open a slot at `at_rank`: every live row at or above it shifts up by one.
/// Returns the number of rows shifted.
pub(crate) fn open_slot<P: Partition>(
    conn: &Connection,
    scope: &P,
    at_rank: i64,
) -> rusqlite::Result<usize> {
    let sql = format!(
        "UPDATE {table} SET rank = rank + 1
         WHERE {scope} AND is_deleted = 0 AND rank >= ?",
        table = P::TABLE,
        scope = P::SCOPE_SQL,
    );
    let mut params = scope.scope_params();
    params.push(Value::Integer(at_rank));
    conn.execute(&sql, params_from_iter(params))
}

/// Shift the span between a row's current and requested rank within one
/// partition. The moving row itself is untouched (its rank never lies inside
/// the open span), so the caller re-ranks it afterwards. Returns the number
/// of rows shifted: exactly `|target - source|`.
pub(crate) fn shift_span<P: Partition>(
    conn: &Connection,
    scope: &P,
    source_rank: i64,
    target_rank: i64,
) -> rusqlite::Result<usize> {
    let sql = match target_rank.cmp(&source_rank) {
        Ordering::Equal => return Ok(0),
        // Moving down the list: rows in (source, target] slide up one slot.
        Ordering::Greater => format!(
            "UPDATE {table} SET rank = rank - 1
             WHERE {scope} AND is_deleted = 0 AND rank > ? AND rank <= ?",
            table = P::TABLE,
            scope = P::SCOPE_SQL,
        ),
        // Moving up the list: rows in [target, source) slide down one slot.
        Ordering::Less => format!(
            "UPDATE {table} SET rank = rank + 1
             WHERE {scope} AND is_deleted = 0 AND rank >= ? AND rank < ?",
            table = P::TABLE,
            scope = P::SCOPE_SQL,
        ),
    };

    let (lo, hi) = if target_rank > source_rank {
        (source_rank, target_rank)
    } else {
        (target_rank, source_rank)
    };
    let mut params = scope.scope_params();
    params.push(Value::Integer(lo));
    params.push(Value::Integer(hi));
    conn.execute(&sql, params_from_iter(params))
}

/// Live ranks of the partition in ascending order; test and audit helper.
#[cfg(test)]
pub(crate) fn live_ranks<P: Partition>(conn: &Connection, scope: &P) -> rusqlite::Result<Vec<i64>> {
    let sql = format!(
        "SELECT rank FROM {table} WHERE {scope} AND is_deleted = 0 ORDER BY rank",
        table = P::TABLE,
        scope = P::SCOPE_SQL,
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(scope.scope_params()), |row| row.get(0))?;
    rows.collect()
}
