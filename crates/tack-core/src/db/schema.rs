//! Canonical SQLite schema for the tack store.
//!
//! Two ranked tables plus store metadata:
//! - `cards` holds work items; a card's partition is `(board_id, lane)` and
//!   its `rank` is dense within that partition among live rows
//! - `boards` holds the board list, itself one ranked partition
//! - `store_meta` records the schema version applied to this store
//!
//! Soft deletion is a flag, never a row removal; the engine relies on the
//! `is_deleted = 0` predicate everywhere ranks are read or shifted.

/// Migration v1: ranked tables plus store metadata.
pub const MIGRATION_V1_SQL: &str = r"
CREATE TABLE IF NOT EXISTS boards (
    board_id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    rank INTEGER NOT NULL CHECK (rank >= 0),
    is_deleted INTEGER NOT NULL DEFAULT 0 CHECK (is_deleted IN (0, 1)),
    deleted_at_us INTEGER,
    created_at_us INTEGER NOT NULL,
    updated_at_us INTEGER NOT NULL,
    CHECK (board_id LIKE 'bd-%')
);

CREATE TABLE IF NOT EXISTS cards (
    card_id TEXT PRIMARY KEY,
    board_id TEXT REFERENCES boards(board_id) ON DELETE SET NULL,
    lane TEXT NOT NULL CHECK (lane IN ('backlog', 'in_progress', 'review', 'done')),
    rank INTEGER NOT NULL CHECK (rank >= 0),
    title TEXT NOT NULL,
    body TEXT,
    priority TEXT NOT NULL DEFAULT 'normal' CHECK (priority IN ('low', 'normal', 'high')),
    due_at_us INTEGER,
    assignee TEXT,
    is_deleted INTEGER NOT NULL DEFAULT 0 CHECK (is_deleted IN (0, 1)),
    deleted_at_us INTEGER,
    created_at_us INTEGER NOT NULL,
    updated_at_us INTEGER NOT NULL,
    CHECK (card_id LIKE 'cd-%')
);

CREATE TABLE IF NOT EXISTS store_meta (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    schema_version INTEGER NOT NULL,
    created_at_us INTEGER NOT NULL DEFAULT 0
);

INSERT OR IGNORE INTO store_meta (id, schema_version, created_at_us) VALUES (1, 1, 0);
";

/// Migration v2: read-path indexes for partition scans.
///
/// `idx_cards_scope_rank` is deliberately non-unique: a span shift updates
/// many rows in one statement and SQLite checks uniqueness per row, so a
/// unique index would reject transient states the committed result never
/// contains. Density is the engine's invariant, audited by
/// [`crate::verify::audit`].
pub const MIGRATION_V2_SQL: &str = r"
CREATE INDEX IF NOT EXISTS idx_cards_scope_rank
    ON cards(board_id, lane, rank) WHERE is_deleted = 0;

CREATE INDEX IF NOT EXISTS idx_cards_deleted
    ON cards(is_deleted, board_id);

CREATE INDEX IF NOT EXISTS idx_boards_rank
    ON boards(rank) WHERE is_deleted = 0;
";

/// Index names every migrated store must contain; asserted by tests.
pub const REQUIRED_INDEXES: &[&str] = &["idx_cards_scope_rank", "idx_cards_deleted", "idx_boards_rank"];

/// `ORDER BY` fragment putting lanes in lifecycle order rather than the
/// alphabetical order their TEXT encoding would give.
pub const LANE_ORDER_SQL: &str = "CASE lane \
     WHEN 'backlog' THEN 0 \
     WHEN 'in_progress' THEN 1 \
     WHEN 'review' THEN 2 \
     WHEN 'done' THEN 3 \
     END";
