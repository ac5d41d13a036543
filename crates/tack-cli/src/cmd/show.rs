//! `tk show` — display one card.

use super::{engine_result, open_project_store};
use crate::output::{OutputMode, render_item};
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Card id.
    pub id: String,
}

pub fn run_show(args: &ShowArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let store = open_project_store(project_root, output)?;
    let card = engine_result(store.get_card(&args.id), output)?;
    render_item(&card, output)?;
    Ok(())
}
