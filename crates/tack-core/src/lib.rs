//! tack-core: data model and positional-ordering engine for the tack
//! planning board.
//!
//! Cards carry a dense, per-partition integer rank (partition = owning board
//! + lifecycle lane; boards form one partition of their own). The engine's
//! job is to keep every partition's live ranks exactly `{0..n-1}` across
//! moves, lane transfers, inserts, soft deletions, and restores — under
//! concurrent callers — by running each operation as a single immediate
//! SQLite transaction and shifting only the minimal span of affected rows.
//!
//! # Conventions
//!
//! - **Errors**: typed [`Error`] from engine operations; `anyhow` only at
//!   config-loading edges.
//! - **Logging**: `tracing` macros (`debug!` for every committed mutation).

pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod rank;
pub mod store;
pub mod verify;

pub use error::{Entity, Error, ErrorCode, Result, TargetError};
pub use model::{
    Board, BoardScope, Card, CardDraft, CardFilter, CardPatch, CardScope, Lane, Priority,
};
pub use store::{Store, StoreOptions};
pub use verify::RankViolation;
