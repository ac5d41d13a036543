//! `tk check` — rank-contiguity audit over every partition.

use super::open_project_store;
use crate::output::{OutputMode, render_list, render_success};
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct CheckArgs {}

pub fn run_check(_args: &CheckArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let store = open_project_store(project_root, output)?;
    let violations = store.audit()?;

    if violations.is_empty() {
        render_success(output, "All partitions dense; no rank violations.")?;
        return Ok(());
    }

    render_list(&violations, output)?;
    anyhow::bail!("{} partition(s) violate rank contiguity", violations.len())
}
