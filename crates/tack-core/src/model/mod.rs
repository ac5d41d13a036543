//! Typed data model: cards, boards, and the closed lane enumeration.

mod board;
mod card;

pub use board::{Board, BoardScope};
pub use card::{
    Card, CardDraft, CardFilter, CardPatch, CardScope, InvalidLane, InvalidPriority, Lane,
    Priority,
};

use ulid::Ulid;

/// Prefix for card ids; also enforced by a schema `CHECK`.
pub const CARD_ID_PREFIX: &str = "cd-";

/// Prefix for board ids; also enforced by a schema `CHECK`.
pub const BOARD_ID_PREFIX: &str = "bd-";

/// Mint a fresh card id (`cd-<ulid>`, lowercase).
#[must_use]
pub fn new_card_id() -> String {
    format!("{}{}", CARD_ID_PREFIX, Ulid::new().to_string().to_lowercase())
}

/// Mint a fresh board id (`bd-<ulid>`, lowercase).
#[must_use]
pub fn new_board_id() -> String {
    format!(
        "{}{}",
        BOARD_ID_PREFIX,
        Ulid::new().to_string().to_lowercase()
    )
}
