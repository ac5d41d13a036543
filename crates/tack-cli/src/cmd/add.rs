//! `tk add` — create a new card at the tail of a lane.

use super::{engine_result, open_project_store, parse_due, parse_lane, parse_priority};
use crate::output::{OutputMode, render_item};
use clap::Args;
use std::path::Path;
use tack_core::{CardDraft, CardScope};

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Title of the new card.
    #[arg(short, long)]
    pub title: String,

    /// Lane to create the card in.
    #[arg(short, long, default_value = "backlog")]
    pub lane: String,

    /// Owning board id (omit for an unfiled card).
    #[arg(short, long)]
    pub board: Option<String>,

    /// Body text.
    #[arg(long)]
    pub body: Option<String>,

    /// Priority: low, normal, or high.
    #[arg(short, long, default_value = "normal")]
    pub priority: String,

    /// Assignee.
    #[arg(short, long)]
    pub assignee: Option<String>,

    /// Due date, RFC 3339 (e.g. 2026-09-01T12:00:00Z).
    #[arg(long)]
    pub due: Option<String>,
}

pub fn run_add(args: &AddArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let lane = parse_lane(&args.lane, output)?;
    let priority = parse_priority(&args.priority)?;
    let due_at_us = args.due.as_deref().map(parse_due).transpose()?;

    let mut store = open_project_store(project_root, output)?;
    let scope = CardScope::new(args.board.clone(), lane);
    let draft = CardDraft {
        title: args.title.clone(),
        body: args.body.clone(),
        priority,
        due_at_us,
        assignee: args.assignee.clone(),
    };

    let card = engine_result(store.create_card(&scope, draft), output)?;
    render_item(&card, output)?;
    Ok(())
}
