//! Rank-contiguity audit.
//!
//! Walks every partition in the store and reports the ones whose live ranks
//! are not exactly `{0, 1, ..., n-1}`. A healthy store reports nothing; the
//! property suite and `tk check` both run on this.

use crate::error::Result;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// One partition whose live ranks have drifted from density.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankViolation {
    /// `cards` or `boards`.
    pub table: &'static str,
    /// Human-readable partition description.
    pub scope: String,
    /// Live ranks as found, ascending.
    pub ranks: Vec<i64>,
}

impl fmt::Display for RankViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} partition {} holds ranks {:?}, expected 0..{}",
            self.table,
            self.scope,
            self.ranks,
            self.ranks.len()
        )
    }
}

fn is_dense(ranks: &[i64]) -> bool {
    ranks
        .iter()
        .enumerate()
        .all(|(position, rank)| i64::try_from(position).is_ok_and(|expected| expected == *rank))
}

/// Audit every card partition and the board list.
///
/// # Errors
///
/// Returns [`crate::Error::Store`] if the audit queries fail.
pub fn audit(conn: &Connection) -> Result<Vec<RankViolation>> {
    let mut violations = Vec::new();

    let mut stmt = conn.prepare(
        "SELECT board_id, lane, rank FROM cards
         WHERE is_deleted = 0
         ORDER BY board_id, lane, rank",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, Option<String>>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, i64>(2)?,
        ))
    })?;

    let mut partitions: BTreeMap<(Option<String>, String), Vec<i64>> = BTreeMap::new();
    for row in rows {
        let (board, lane, rank) = row?;
        partitions.entry((board, lane)).or_default().push(rank);
    }

    for ((board, lane), ranks) in partitions {
        if !is_dense(&ranks) {
            let scope = match board {
                Some(id) => format!("{id}/{lane}"),
                None => format!("unfiled/{lane}"),
            };
            violations.push(RankViolation {
                table: "cards",
                scope,
                ranks,
            });
        }
    }

    let mut stmt =
        conn.prepare("SELECT rank FROM boards WHERE is_deleted = 0 ORDER BY rank")?;
    let board_ranks: Vec<i64> = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<_>>()?;
    if !is_dense(&board_ranks) {
        violations.push(RankViolation {
            table: "boards",
            scope: "boards".to_string(),
            ranks: board_ranks,
        });
    }

    Ok(violations)
}
