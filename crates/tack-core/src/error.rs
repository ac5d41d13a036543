//! Error taxonomy for the ordering engine.
//!
//! Every failure an operation can surface is one of the [`Error`] variants;
//! nothing is recovered by silently clamping or coercing input. [`ErrorCode`]
//! provides stable machine-readable codes for agent-friendly decision making.

use std::fmt;
use thiserror::Error;

/// Convenience alias used across the engine.
pub type Result<T> = std::result::Result<T, Error>;

/// Which table an id failed to resolve against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Card,
    Board,
}

impl Entity {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Board => "board",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a move target was rejected before any mutation was attempted.
#[derive(Debug, Error)]
pub enum TargetError {
    /// The requested rank falls outside the destination partition.
    ///
    /// `max` is the highest rank the destination currently accepts: `len - 1`
    /// when reordering within one partition, `len` when transferring in.
    #[error("rank {requested} is out of range (destination accepts 0..={max})")]
    RankOutOfRange { requested: i64, max: i64 },
    /// The destination board does not exist or is soft-deleted.
    #[error("destination board '{id}' not found")]
    UnknownBoard { id: String },
}

/// Failures surfaced by engine operations.
///
/// `Conflict` and `Store` are retryable by the caller (`Conflict` from a
/// fresh read, `Store` with backoff); the engine itself never retries, since
/// replaying a half-read rank snapshot is exactly the corruption the
/// transaction boundary exists to prevent.
#[derive(Debug, Error)]
pub enum Error {
    /// The id does not reference an existing, live row.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: Entity, id: String },

    /// The move destination was rejected; the store is unchanged.
    #[error("invalid target: {0}")]
    InvalidTarget(#[source] TargetError),

    /// The transaction could not be serialized against a concurrent writer.
    #[error("store conflict: {0}")]
    Conflict(#[source] rusqlite::Error),

    /// A persisted value no longer parses (e.g. an unrecognized lane string).
    #[error("corrupt row in store: {detail}")]
    Corrupt { detail: String },

    /// The store could not be reached or the commit failed.
    #[error("store unavailable: {0}")]
    Store(#[source] rusqlite::Error),

    /// The store file could not be created or opened.
    #[error("store unavailable: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn not_found(entity: Entity, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub(crate) fn rank_out_of_range(requested: i64, max: i64) -> Self {
        Self::InvalidTarget(TargetError::RankOutOfRange { requested, max })
    }

    pub(crate) fn unknown_board(id: impl Into<String>) -> Self {
        Self::InvalidTarget(TargetError::UnknownBoard { id: id.into() })
    }

    /// Returns `true` when the caller may retry the whole operation.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_) | Self::Store(_) | Self::Io { .. })
    }

    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound {
                entity: Entity::Card,
                ..
            } => ErrorCode::CardNotFound,
            Self::NotFound {
                entity: Entity::Board,
                ..
            } => ErrorCode::BoardNotFound,
            Self::InvalidTarget(TargetError::RankOutOfRange { .. }) => ErrorCode::RankOutOfRange,
            Self::InvalidTarget(TargetError::UnknownBoard { .. }) => ErrorCode::UnknownBoard,
            Self::Conflict(_) => ErrorCode::Conflict,
            Self::Corrupt { .. } => ErrorCode::CorruptStore,
            Self::Store(_) | Self::Io { .. } => ErrorCode::StoreUnavailable,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        use rusqlite::ErrorCode as Sqlite;
        match err {
            rusqlite::Error::FromSqlConversionFailure(_, _, source) => Self::Corrupt {
                detail: source.to_string(),
            },
            other => match other.sqlite_error_code() {
                Some(Sqlite::DatabaseBusy | Sqlite::DatabaseLocked) => Self::Conflict(other),
                _ => Self::Store(other),
            },
        }
    }
}

/// Machine-readable error codes, stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    ConfigParseError,
    CardNotFound,
    BoardNotFound,
    RankOutOfRange,
    UnknownBoard,
    UnknownLane,
    CorruptStore,
    Conflict,
    StoreUnavailable,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::ConfigParseError => "E1002",
            Self::CardNotFound => "E2001",
            Self::BoardNotFound => "E2002",
            Self::RankOutOfRange => "E2003",
            Self::UnknownBoard => "E2004",
            Self::UnknownLane => "E2005",
            Self::CorruptStore => "E3001",
            Self::Conflict => "E5001",
            Self::StoreUnavailable => "E5002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotInitialized => "Store not initialized",
            Self::ConfigParseError => "Config file parse error",
            Self::CardNotFound => "Card not found",
            Self::BoardNotFound => "Board not found",
            Self::RankOutOfRange => "Target rank out of range",
            Self::UnknownBoard => "Destination board not found",
            Self::UnknownLane => "Unrecognized lane",
            Self::CorruptStore => "Corrupt store row",
            Self::Conflict => "Concurrent operation conflict",
            Self::StoreUnavailable => "Store unavailable",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `tk init` to create the store in this directory."),
            Self::ConfigParseError => Some("Fix syntax in .tack/config.toml and retry."),
            Self::CardNotFound | Self::BoardNotFound => None,
            Self::RankOutOfRange => {
                Some("Ranks are zero-based; the tail position equals the column size.")
            }
            Self::UnknownBoard => Some("List live boards with `tk board ls`."),
            Self::UnknownLane => Some("Lanes are backlog, in_progress, review, and done."),
            Self::CorruptStore => Some("Inspect the store with `tk check`."),
            Self::Conflict => Some("Retry the command; a concurrent writer held the store."),
            Self::StoreUnavailable => Some("Check the store path and permissions, then retry."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::{Entity, Error, ErrorCode};
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::NotInitialized,
            ErrorCode::ConfigParseError,
            ErrorCode::CardNotFound,
            ErrorCode::BoardNotFound,
            ErrorCode::RankOutOfRange,
            ErrorCode::UnknownBoard,
            ErrorCode::UnknownLane,
            ErrorCode::CorruptStore,
            ErrorCode::Conflict,
            ErrorCode::StoreUnavailable,
            ErrorCode::InternalUnexpected,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::RankOutOfRange.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn error_maps_to_expected_code() {
        assert_eq!(
            Error::not_found(Entity::Card, "cd-x").code(),
            ErrorCode::CardNotFound
        );
        assert_eq!(
            Error::rank_out_of_range(7, 3).code(),
            ErrorCode::RankOutOfRange
        );
        assert_eq!(Error::unknown_board("bd-x").code(), ErrorCode::UnknownBoard);
    }

    #[test]
    fn retryable_classification() {
        assert!(!Error::not_found(Entity::Card, "cd-x").is_retryable());
        assert!(!Error::rank_out_of_range(0, 0).is_retryable());
        assert!(
            Error::Store(rusqlite::Error::InvalidQuery).is_retryable(),
            "infrastructure failures are retryable with backoff"
        );
    }

    #[test]
    fn busy_maps_to_conflict() {
        let busy = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        );
        assert!(matches!(Error::from(busy), Error::Conflict(_)));

        let misuse = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_MISUSE),
            None,
        );
        assert!(matches!(Error::from(misuse), Error::Store(_)));
    }
}
