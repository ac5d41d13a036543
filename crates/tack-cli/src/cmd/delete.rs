//! `tk rm` / `tk restore` — soft deletion and tail restore for cards.

use super::{engine_result, open_project_store};
use crate::output::{OutputMode, render_item, render_success};
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct RmArgs {
    /// Card id to soft-delete.
    pub id: String,
}

pub fn run_rm(args: &RmArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let mut store = open_project_store(project_root, output)?;
    let card = engine_result(store.delete_card(&args.id), output)?;
    render_success(output, &format!("Deleted {} ({})", card.id, card.title))?;
    Ok(())
}

#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Card id to restore (lands at the tail of its lane).
    pub id: String,
}

pub fn run_restore(
    args: &RestoreArgs,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let mut store = open_project_store(project_root, output)?;
    let card = engine_result(store.restore_card(&args.id), output)?;
    render_item(&card, output)?;
    Ok(())
}
