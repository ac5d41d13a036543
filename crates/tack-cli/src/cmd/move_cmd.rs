//! `tk move` — move a card to a new rank, lane, or board.

use super::{engine_result, open_project_store, parse_lane};
use crate::output::{OutputMode, render_list};
use clap::Args;
use std::path::Path;
use tack_core::CardScope;

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Card id to move.
    pub id: String,

    /// Destination rank (zero-based; a lane's size appends at its tail).
    #[arg(long)]
    pub to: i64,

    /// Destination lane. Defaults to the card's current lane.
    #[arg(long)]
    pub lane: Option<String>,

    /// Destination board id. Use "none" to unfile; defaults to the card's
    /// current board.
    #[arg(long)]
    pub board: Option<String>,
}

pub fn run_move(args: &MoveArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let mut store = open_project_store(project_root, output)?;
    let card = engine_result(store.get_card(&args.id), output)?;

    let lane = match args.lane.as_deref() {
        Some(raw) => parse_lane(raw, output)?,
        None => card.lane,
    };
    let board = match args.board.as_deref() {
        Some("none") => None,
        Some(id) => Some(id.to_string()),
        None => card.board_id.clone(),
    };

    let dest = CardScope::new(board, lane);
    let reordered = engine_result(store.move_card(&args.id, &dest, args.to), output)?;
    render_list(&reordered, output)?;
    Ok(())
}
