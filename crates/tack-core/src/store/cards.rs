//! Card operations: append-on-create, move, list, payload update, soft
//! delete, and restore.

use super::{CARD_COLUMNS, Store, card_from_row, now_us};
use crate::db::schema;
use crate::error::{Entity, Error, Result};
use crate::model::{Card, CardDraft, CardFilter, CardPatch, CardScope, new_card_id};
use crate::rank;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter, types::Value};

impl Store {
    /// Create a card at the tail of `scope`: rank `max + 1`, or 0 when the
    /// partition is empty. The read and the insert share one immediate
    /// transaction, so two concurrent creates cannot mint the same rank.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTarget`] when `scope` names an unknown or deleted
    /// board; [`Error::Conflict`] / [`Error::Store`] on store failures.
    pub fn create_card(&mut self, scope: &CardScope, draft: CardDraft) -> Result<Card> {
        let tx = self.write_tx()?;
        if let Some(board) = &scope.board {
            if !board_is_live(&tx, board)? {
                return Err(Error::unknown_board(board.clone()));
            }
        }

        let rank = rank::next_rank(&tx, scope)?;
        let id = new_card_id();
        let now = now_us();
        tx.execute(
            "INSERT INTO cards (card_id, board_id, lane, rank, title, body, priority,
                                due_at_us, assignee, created_at_us, updated_at_us)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
            params![
                id,
                scope.board,
                scope.lane.as_str(),
                rank,
                draft.title,
                draft.body,
                draft.priority.as_str(),
                draft.due_at_us,
                draft.assignee,
                now,
            ],
        )?;
        tx.commit()?;

        tracing::debug!(card = %id, scope = %scope, rank, "created card");
        Ok(Card {
            id,
            board_id: scope.board.clone(),
            lane: scope.lane,
            rank,
            title: draft.title,
            body: draft.body,
            priority: draft.priority,
            due_at_us: draft.due_at_us,
            assignee: draft.assignee,
            is_deleted: false,
            deleted_at_us: None,
            created_at_us: now,
            updated_at_us: now,
        })
    }

    /// Move a card to `target_rank` in `dest`, shifting only the rows between
    /// the old and new position. Returns the live cards of the affected
    /// partition(s) — source first when they differ — each ordered by rank.
    ///
    /// `target_rank` means "insert before the row currently at this rank",
    /// counted after the moving card has notionally left its source: within
    /// one partition the valid range is `0..=len-1`, across partitions it is
    /// `0..=dest_len` (the tail append).
    ///
    /// A move to the card's current position is a no-op that writes nothing.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown or deleted card,
    /// [`Error::InvalidTarget`] for an out-of-range rank or unknown board,
    /// [`Error::Conflict`] / [`Error::Store`] on store failures. On any
    /// failure the transaction rolls back; no partial shift persists.
    pub fn move_card(
        &mut self,
        id: &str,
        dest: &CardScope,
        target_rank: i64,
    ) -> Result<Vec<Card>> {
        let tx = self.write_tx()?;
        let card = read_live_card(&tx, id)?
            .ok_or_else(|| Error::not_found(Entity::Card, id))?;
        if let Some(board) = &dest.board {
            if !board_is_live(&tx, board)? {
                return Err(Error::unknown_board(board.clone()));
            }
        }

        let source = card.scope();
        let result = if source == *dest {
            let len = rank::live_len(&tx, &source)?;
            let max = len - 1;
            if target_rank < 0 || target_rank > max {
                return Err(Error::rank_out_of_range(target_rank, max));
            }
            if target_rank != card.rank {
                rank::shift_span(&tx, &source, card.rank, target_rank)?;
                tx.execute(
                    "UPDATE cards SET rank = ?1, updated_at_us = ?2 WHERE card_id = ?3",
                    params![target_rank, now_us(), id],
                )?;
                tracing::debug!(
                    card = id,
                    scope = %source,
                    from = card.rank,
                    to = target_rank,
                    "reordered card"
                );
            }
            cards_in_scope(&tx, &source)?
        } else {
            let dest_len = rank::live_len(&tx, dest)?;
            if target_rank < 0 || target_rank > dest_len {
                return Err(Error::rank_out_of_range(target_rank, dest_len));
            }
            rank::close_gap(&tx, &source, card.rank)?;
            rank::open_slot(&tx, dest, target_rank)?;
            tx.execute(
                "UPDATE cards SET board_id = ?1, lane = ?2, rank = ?3, updated_at_us = ?4
                 WHERE card_id = ?5",
                params![dest.board, dest.lane.as_str(), target_rank, now_us(), id],
            )?;
            tracing::debug!(
                card = id,
                from = %source,
                to = %dest,
                rank = target_rank,
                "transferred card"
            );

            let mut rows = cards_in_scope(&tx, &source)?;
            rows.extend(cards_in_scope(&tx, dest)?);
            rows
        };

        tx.commit()?;
        Ok(result)
    }

    /// List cards matching `filter`, ordered by board, lane (lifecycle
    /// order), then rank.
    ///
    /// # Errors
    ///
    /// [`Error::Store`] on query failure, [`Error::Corrupt`] if a persisted
    /// enum string no longer parses.
    pub fn cards(&self, filter: &CardFilter) -> Result<Vec<Card>> {
        let mut sql = format!("SELECT {CARD_COLUMNS} FROM cards WHERE 1 = 1");
        let mut bind: Vec<Value> = Vec::new();

        if !filter.include_deleted {
            sql.push_str(" AND is_deleted = 0");
        }
        if let Some(board) = &filter.board {
            sql.push_str(" AND board_id = ?");
            bind.push(Value::Text(board.clone()));
        }
        if let Some(lane) = filter.lane {
            sql.push_str(" AND lane = ?");
            bind.push(Value::Text(lane.to_string()));
        }
        sql.push_str(" ORDER BY board_id, ");
        sql.push_str(schema::LANE_ORDER_SQL);
        sql.push_str(", rank");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(bind), card_from_row)?;
        let mut cards = Vec::new();
        for row in rows {
            cards.push(row?);
        }
        Ok(cards)
    }

    /// Fetch one live card.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for unknown or soft-deleted ids.
    pub fn get_card(&self, id: &str) -> Result<Card> {
        read_live_card(&self.conn, id)?.ok_or_else(|| Error::not_found(Entity::Card, id))
    }

    /// Apply a payload-only patch. Partition and rank are never touched here;
    /// moving is [`Store::move_card`]'s job.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for unknown or deleted ids, plus store failures.
    pub fn update_card(&mut self, id: &str, patch: &CardPatch) -> Result<Card> {
        let tx = self.write_tx()?;
        let card = read_live_card(&tx, id)?
            .ok_or_else(|| Error::not_found(Entity::Card, id))?;

        if patch.is_empty() {
            tx.commit()?;
            return Ok(card);
        }

        let mut sets: Vec<&str> = Vec::new();
        let mut bind: Vec<Value> = Vec::new();
        if let Some(title) = &patch.title {
            sets.push("title = ?");
            bind.push(Value::Text(title.clone()));
        }
        if let Some(body) = &patch.body {
            sets.push("body = ?");
            bind.push(Value::Text(body.clone()));
        }
        if let Some(priority) = patch.priority {
            sets.push("priority = ?");
            bind.push(Value::Text(priority.to_string()));
        }
        if let Some(due) = patch.due_at_us {
            sets.push("due_at_us = ?");
            bind.push(Value::Integer(due));
        }
        if let Some(assignee) = &patch.assignee {
            sets.push("assignee = ?");
            bind.push(Value::Text(assignee.clone()));
        }
        sets.push("updated_at_us = ?");
        bind.push(Value::Integer(now_us()));
        bind.push(Value::Text(id.to_string()));

        let sql = format!(
            "UPDATE cards SET {} WHERE card_id = ?",
            sets.join(", ")
        );
        tx.execute(&sql, params_from_iter(bind))?;

        let updated = read_live_card(&tx, id)?
            .ok_or_else(|| Error::not_found(Entity::Card, id))?;
        tx.commit()?;
        Ok(updated)
    }

    /// Soft-delete a card and close the rank gap it leaves, so the partition
    /// stays dense for the next drag-and-drop index. The row itself is kept
    /// (flag + timestamp); see DESIGN.md for the policy discussion.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for unknown or already-deleted ids.
    pub fn delete_card(&mut self, id: &str) -> Result<Card> {
        let tx = self.write_tx()?;
        let card = read_live_card(&tx, id)?
            .ok_or_else(|| Error::not_found(Entity::Card, id))?;

        let now = now_us();
        tx.execute(
            "UPDATE cards SET is_deleted = 1, deleted_at_us = ?1, updated_at_us = ?1
             WHERE card_id = ?2",
            params![now, id],
        )?;
        rank::close_gap(&tx, &card.scope(), card.rank)?;
        tx.commit()?;

        tracing::debug!(card = id, scope = %card.scope(), "soft-deleted card");
        Ok(Card {
            is_deleted: true,
            deleted_at_us: Some(now),
            updated_at_us: now,
            ..card
        })
    }

    /// Restore a soft-deleted card at the tail of its partition. The stored
    /// rank is stale by then (delete compacted past it), so tail placement is
    /// the one deterministic choice that cannot collide. Restoring a live
    /// card is a no-op returning it unchanged.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when the id has no row at all.
    pub fn restore_card(&mut self, id: &str) -> Result<Card> {
        let tx = self.write_tx()?;
        let card = read_card_any(&tx, id)?
            .ok_or_else(|| Error::not_found(Entity::Card, id))?;
        if !card.is_deleted {
            tx.commit()?;
            return Ok(card);
        }

        let scope = card.scope();
        let tail = rank::next_rank(&tx, &scope)?;
        let now = now_us();
        tx.execute(
            "UPDATE cards SET is_deleted = 0, deleted_at_us = NULL, rank = ?1,
                              updated_at_us = ?2
             WHERE card_id = ?3",
            params![tail, now, id],
        )?;
        tx.commit()?;

        tracing::debug!(card = id, scope = %scope, rank = tail, "restored card at tail");
        Ok(Card {
            is_deleted: false,
            deleted_at_us: None,
            rank: tail,
            updated_at_us: now,
            ..card
        })
    }
}

fn read_live_card(conn: &Connection, id: &str) -> Result<Option<Card>> {
    conn.query_row(
        &format!("SELECT {CARD_COLUMNS} FROM cards WHERE card_id = ?1 AND is_deleted = 0"),
        params![id],
        card_from_row,
    )
    .optional()
    .map_err(Error::from)
}

fn read_card_any(conn: &Connection, id: &str) -> Result<Option<Card>> {
    conn.query_row(
        &format!("SELECT {CARD_COLUMNS} FROM cards WHERE card_id = ?1"),
        params![id],
        card_from_row,
    )
    .optional()
    .map_err(Error::from)
}

fn board_is_live(conn: &Connection, board_id: &str) -> Result<bool> {
    let live: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM boards WHERE board_id = ?1 AND is_deleted = 0)",
        params![board_id],
        |row| row.get(0),
    )?;
    Ok(live)
}

fn cards_in_scope(conn: &Connection, scope: &CardScope) -> Result<Vec<Card>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CARD_COLUMNS} FROM cards
         WHERE board_id IS ?1 AND lane = ?2 AND is_deleted = 0
         ORDER BY rank"
    ))?;
    let rows = stmt.query_map(params![scope.board, scope.lane.as_str()], card_from_row)?;
    let mut cards = Vec::new();
    for row in rows {
        cards.push(row?);
    }
    Ok(cards)
}
