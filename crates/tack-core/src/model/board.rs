use serde::Serialize;

/// The singleton partition holding every live board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardScope;

/// A board row. Boards form a single ranked partition of their own: the set
/// of live boards, ordered by `rank` with the same density rules as cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    pub id: String,
    pub name: String,
    pub rank: i64,
    pub is_deleted: bool,
    pub deleted_at_us: Option<i64>,
    pub created_at_us: i64,
    pub updated_at_us: i64,
}
