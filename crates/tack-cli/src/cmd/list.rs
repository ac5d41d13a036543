//! `tk ls` — list cards ordered by board, lane, then rank.

use super::{open_project_store, parse_lane};
use crate::output::{OutputMode, render_list};
use clap::Args;
use std::path::Path;
use tack_core::CardFilter;

#[derive(Args, Debug)]
pub struct LsArgs {
    /// Restrict to one board id.
    #[arg(long)]
    pub board: Option<String>,

    /// Restrict to one lane.
    #[arg(long)]
    pub lane: Option<String>,

    /// Include soft-deleted cards (their ranks are stale by design).
    #[arg(long)]
    pub deleted: bool,
}

pub fn run_list(args: &LsArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let lane = args
        .lane
        .as_deref()
        .map(|raw| parse_lane(raw, output))
        .transpose()?;

    let store = open_project_store(project_root, output)?;
    let filter = CardFilter {
        board: args.board.clone(),
        lane,
        include_deleted: args.deleted,
    };
    let cards = store.cards(&filter)?;
    render_list(&cards, output)?;
    Ok(())
}
