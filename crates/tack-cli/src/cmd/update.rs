//! `tk update` — payload-only edits; position never changes here.

use super::{engine_result, open_project_store, parse_due, parse_priority};
use crate::output::{OutputMode, render_item};
use clap::Args;
use std::path::Path;
use tack_core::CardPatch;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Card id.
    pub id: String,

    /// New title.
    #[arg(long)]
    pub title: Option<String>,

    /// New body text.
    #[arg(long)]
    pub body: Option<String>,

    /// New priority: low, normal, or high.
    #[arg(long)]
    pub priority: Option<String>,

    /// New assignee.
    #[arg(long)]
    pub assignee: Option<String>,

    /// New due date, RFC 3339.
    #[arg(long)]
    pub due: Option<String>,
}

pub fn run_update(args: &UpdateArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let priority = args.priority.as_deref().map(parse_priority).transpose()?;
    let due_at_us = args.due.as_deref().map(parse_due).transpose()?;

    let patch = CardPatch {
        title: args.title.clone(),
        body: args.body.clone(),
        priority,
        due_at_us,
        assignee: args.assignee.clone(),
    };

    let mut store = open_project_store(project_root, output)?;
    let card = engine_result(store.update_card(&args.id, &patch), output)?;
    render_item(&card, output)?;
    Ok(())
}
