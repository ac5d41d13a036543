use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// The four lifecycle lanes of a board.
///
/// A closed enumeration: lane strings from outside the crate must pass
/// through [`FromStr`], so an unrecognized lane is rejected before it can
/// reach the ordering engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    Backlog,
    InProgress,
    Review,
    Done,
}

/// Unrecognized lane string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized lane '{0}' (expected backlog, in_progress, review, or done)")]
pub struct InvalidLane(pub String);

impl Lane {
    /// All lanes in display order.
    pub const ALL: [Self; 4] = [Self::Backlog, Self::InProgress, Self::Review, Self::Done];

    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::InProgress => "in_progress",
            Self::Review => "review",
            Self::Done => "done",
        }
    }

    /// Position of this lane in display order.
    #[must_use]
    pub const fn display_order(self) -> u8 {
        match self {
            Self::Backlog => 0,
            Self::InProgress => 1,
            Self::Review => 2,
            Self::Done => 3,
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lane {
    type Err = InvalidLane;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "backlog" => Ok(Self::Backlog),
            "in_progress" => Ok(Self::InProgress),
            "review" => Ok(Self::Review),
            "done" => Ok(Self::Done),
            other => Err(InvalidLane(other.to_string())),
        }
    }
}

/// Human priority override; opaque payload to the ordering engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

/// Unrecognized priority string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized priority '{0}' (expected low, normal, or high)")]
pub struct InvalidPriority(pub String);

impl Priority {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = InvalidPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            other => Err(InvalidPriority(other.to_string())),
        }
    }
}

/// The partition a card's rank lives in: owning board (if filed) plus lane.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardScope {
    /// Owning board id, or `None` for unfiled cards.
    pub board: Option<String>,
    pub lane: Lane,
}

impl CardScope {
    #[must_use]
    pub fn new(board: Option<String>, lane: Lane) -> Self {
        Self { board, lane }
    }
}

impl fmt::Display for CardScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.board {
            Some(board) => write!(f, "{board}/{}", self.lane),
            None => write!(f, "unfiled/{}", self.lane),
        }
    }
}

/// A card row. Only `board_id`, `lane`, and `rank` matter to the ordering
/// engine; the rest is payload carried for the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub id: String,
    pub board_id: Option<String>,
    pub lane: Lane,
    pub rank: i64,
    pub title: String,
    pub body: Option<String>,
    pub priority: Priority,
    pub due_at_us: Option<i64>,
    pub assignee: Option<String>,
    pub is_deleted: bool,
    pub deleted_at_us: Option<i64>,
    pub created_at_us: i64,
    pub updated_at_us: i64,
}

impl Card {
    /// The partition this card's rank is scoped to.
    #[must_use]
    pub fn scope(&self) -> CardScope {
        CardScope::new(self.board_id.clone(), self.lane)
    }
}

/// Payload for a new card; rank assignment is the engine's job.
#[derive(Debug, Clone, Default)]
pub struct CardDraft {
    pub title: String,
    pub body: Option<String>,
    pub priority: Priority,
    pub due_at_us: Option<i64>,
    pub assignee: Option<String>,
}

impl CardDraft {
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Payload-only update; fields left `None` keep their current value.
/// Position is deliberately absent — moving goes through the engine.
#[derive(Debug, Clone, Default)]
pub struct CardPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub priority: Option<Priority>,
    pub due_at_us: Option<i64>,
    pub assignee: Option<String>,
}

impl CardPatch {
    /// Returns `true` when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.body.is_none()
            && self.priority.is_none()
            && self.due_at_us.is_none()
            && self.assignee.is_none()
    }
}

/// Listing filter for [`crate::Store::cards`].
#[derive(Debug, Clone, Default)]
pub struct CardFilter {
    /// Restrict to one board id; `None` lists every board (and unfiled cards).
    pub board: Option<String>,
    /// Restrict to one lane.
    pub lane: Option<Lane>,
    /// Include soft-deleted rows (inspection only; they carry stale ranks).
    pub include_deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::{CardPatch, CardScope, Lane, Priority};
    use std::str::FromStr;

    #[test]
    fn enum_json_roundtrips() {
        assert_eq!(serde_json::to_string(&Lane::Backlog).expect("ser"), "\"backlog\"");
        assert_eq!(
            serde_json::to_string(&Lane::InProgress).expect("ser"),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::to_string(&Priority::Normal).expect("ser"),
            "\"normal\""
        );

        assert_eq!(
            serde_json::from_str::<Lane>("\"review\"").expect("de"),
            Lane::Review
        );
        assert_eq!(
            serde_json::from_str::<Priority>("\"high\"").expect("de"),
            Priority::High
        );
    }

    #[test]
    fn display_parse_roundtrips() {
        for lane in Lane::ALL {
            let rendered = lane.to_string();
            let reparsed = Lane::from_str(&rendered).expect("reparse");
            assert_eq!(lane, reparsed);
        }

        for priority in [Priority::Low, Priority::Normal, Priority::High] {
            let rendered = priority.to_string();
            let reparsed = Priority::from_str(&rendered).expect("reparse");
            assert_eq!(priority, reparsed);
        }
    }

    #[test]
    fn parse_rejects_unknown_values() {
        assert!(Lane::from_str("todo").is_err());
        assert!(Lane::from_str("Backlog").is_err());
        assert!(Lane::from_str("").is_err());
        assert!(Priority::from_str("urgent").is_err());
    }

    #[test]
    fn display_order_is_lifecycle_order() {
        let mut orders: Vec<u8> = Lane::ALL.iter().map(|l| l.display_order()).collect();
        orders.sort_unstable();
        assert_eq!(orders, vec![0, 1, 2, 3]);
        assert_eq!(Lane::Backlog.display_order(), 0);
        assert_eq!(Lane::Done.display_order(), 3);
    }

    #[test]
    fn scope_display_names_unfiled() {
        let unfiled = CardScope::new(None, Lane::Review);
        assert_eq!(unfiled.to_string(), "unfiled/review");

        let filed = CardScope::new(Some("bd-1".into()), Lane::Done);
        assert_eq!(filed.to_string(), "bd-1/done");
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(CardPatch::default().is_empty());
        let patch = CardPatch {
            title: Some("t".into()),
            ..CardPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
