//! Board operations. Boards are the second instantiation of the ranked
//! partition: one global scope holding every live board.

use super::{BOARD_COLUMNS, Store, board_from_row, now_us};
use crate::error::{Entity, Error, Result};
use crate::model::{Board, BoardScope, new_board_id};
use crate::rank;
use rusqlite::{Connection, OptionalExtension, params};

impl Store {
    /// Create a board at the tail of the board list.
    ///
    /// # Errors
    ///
    /// [`Error::Conflict`] / [`Error::Store`] on store failures.
    pub fn create_board(&mut self, name: &str) -> Result<Board> {
        let tx = self.write_tx()?;
        let rank = rank::next_rank(&tx, &BoardScope)?;
        let id = new_board_id();
        let now = now_us();
        tx.execute(
            "INSERT INTO boards (board_id, name, rank, created_at_us, updated_at_us)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![id, name, rank, now],
        )?;
        tx.commit()?;

        tracing::debug!(board = %id, rank, "created board");
        Ok(Board {
            id,
            name: name.to_string(),
            rank,
            is_deleted: false,
            deleted_at_us: None,
            created_at_us: now,
            updated_at_us: now,
        })
    }

    /// Live boards ordered by rank.
    ///
    /// # Errors
    ///
    /// [`Error::Store`] on query failure.
    pub fn boards(&self, include_deleted: bool) -> Result<Vec<Board>> {
        let sql = if include_deleted {
            format!("SELECT {BOARD_COLUMNS} FROM boards ORDER BY is_deleted, rank")
        } else {
            format!("SELECT {BOARD_COLUMNS} FROM boards WHERE is_deleted = 0 ORDER BY rank")
        };
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], board_from_row)?;
        let mut boards = Vec::new();
        for row in rows {
            boards.push(row?);
        }
        Ok(boards)
    }

    /// Fetch one live board.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for unknown or soft-deleted ids.
    pub fn get_board(&self, id: &str) -> Result<Board> {
        read_live_board(&self.conn, id)?.ok_or_else(|| Error::not_found(Entity::Board, id))
    }

    /// Move a board to `target_rank` in the board list; same shift algebra
    /// as cards, valid range `0..=len-1`. Returns the re-ranked live list.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`], [`Error::InvalidTarget`], or store failures; the
    /// transaction rolls back on any of them.
    pub fn move_board(&mut self, id: &str, target_rank: i64) -> Result<Vec<Board>> {
        let tx = self.write_tx()?;
        let board = read_live_board(&tx, id)?
            .ok_or_else(|| Error::not_found(Entity::Board, id))?;

        let len = rank::live_len(&tx, &BoardScope)?;
        let max = len - 1;
        if target_rank < 0 || target_rank > max {
            return Err(Error::rank_out_of_range(target_rank, max));
        }
        if target_rank != board.rank {
            rank::shift_span(&tx, &BoardScope, board.rank, target_rank)?;
            tx.execute(
                "UPDATE boards SET rank = ?1, updated_at_us = ?2 WHERE board_id = ?3",
                params![target_rank, now_us(), id],
            )?;
            tracing::debug!(board = id, from = board.rank, to = target_rank, "reordered board");
        }

        let mut stmt = tx.prepare(&format!(
            "SELECT {BOARD_COLUMNS} FROM boards WHERE is_deleted = 0 ORDER BY rank"
        ))?;
        let rows = stmt.query_map([], board_from_row)?;
        let mut boards = Vec::new();
        for row in rows {
            boards.push(row?);
        }
        drop(stmt);

        tx.commit()?;
        Ok(boards)
    }

    /// Rename a board; rank untouched.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for unknown or deleted ids, plus store failures.
    pub fn rename_board(&mut self, id: &str, name: &str) -> Result<Board> {
        let tx = self.write_tx()?;
        let board = read_live_board(&tx, id)?
            .ok_or_else(|| Error::not_found(Entity::Board, id))?;

        let now = now_us();
        tx.execute(
            "UPDATE boards SET name = ?1, updated_at_us = ?2 WHERE board_id = ?3",
            params![name, now, id],
        )?;
        tx.commit()?;
        Ok(Board {
            name: name.to_string(),
            updated_at_us: now,
            ..board
        })
    }

    /// Soft-delete a board and close the gap in the board list. The board's
    /// cards keep their rows and their per-lane orderings; they come back
    /// intact if the board is restored.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for unknown or already-deleted ids.
    pub fn delete_board(&mut self, id: &str) -> Result<Board> {
        let tx = self.write_tx()?;
        let board = read_live_board(&tx, id)?
            .ok_or_else(|| Error::not_found(Entity::Board, id))?;

        let now = now_us();
        tx.execute(
            "UPDATE boards SET is_deleted = 1, deleted_at_us = ?1, updated_at_us = ?1
             WHERE board_id = ?2",
            params![now, id],
        )?;
        rank::close_gap(&tx, &BoardScope, board.rank)?;
        tx.commit()?;

        tracing::debug!(board = id, "soft-deleted board");
        Ok(Board {
            is_deleted: true,
            deleted_at_us: Some(now),
            updated_at_us: now,
            ..board
        })
    }

    /// Restore a soft-deleted board at the tail of the board list; no-op for
    /// live boards (same policy as cards).
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when the id has no row at all.
    pub fn restore_board(&mut self, id: &str) -> Result<Board> {
        let tx = self.write_tx()?;
        let board = read_board_any(&tx, id)?
            .ok_or_else(|| Error::not_found(Entity::Board, id))?;
        if !board.is_deleted {
            tx.commit()?;
            return Ok(board);
        }

        let tail = rank::next_rank(&tx, &BoardScope)?;
        let now = now_us();
        tx.execute(
            "UPDATE boards SET is_deleted = 0, deleted_at_us = NULL, rank = ?1,
                               updated_at_us = ?2
             WHERE board_id = ?3",
            params![tail, now, id],
        )?;
        tx.commit()?;

        tracing::debug!(board = id, rank = tail, "restored board at tail");
        Ok(Board {
            is_deleted: false,
            deleted_at_us: None,
            rank: tail,
            updated_at_us: now,
            ..board
        })
    }
}

fn read_live_board(conn: &Connection, id: &str) -> Result<Option<Board>> {
    conn.query_row(
        &format!("SELECT {BOARD_COLUMNS} FROM boards WHERE board_id = ?1 AND is_deleted = 0"),
        params![id],
        board_from_row,
    )
    .optional()
    .map_err(Error::from)
}

fn read_board_any(conn: &Connection, id: &str) -> Result<Option<Board>> {
    conn.query_row(
        &format!("SELECT {BOARD_COLUMNS} FROM boards WHERE board_id = ?1"),
        params![id],
        board_from_row,
    )
    .optional()
    .map_err(Error::from)
}
