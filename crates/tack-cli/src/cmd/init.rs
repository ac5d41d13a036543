//! `tk init` — create the store skeleton in the current directory.

use crate::output::{OutputMode, render_success};
use anyhow::Context as _;
use clap::Args;
use std::path::Path;
use tack_core::{Store, config};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force re-initialization even if `.tack/` already exists.
    #[arg(long)]
    pub force: bool,
}

const CONFIG_TOML: &str = "[store]\nbusy_timeout_ms = 5000\n";

const GITIGNORE: &str = "tack.db\ntack.db-wal\ntack.db-shm\n";

/// Execute `tk init`. Creates the project skeleton:
///
/// ```text
/// .tack/
///   tack.db         (SQLite store, schema migrated to latest)
///   config.toml     (default project config template)
///   .gitignore      (store file and WAL side files)
/// ```
///
/// # Errors
///
/// Returns an error if `.tack/` already exists and `--force` is not set,
/// or if any filesystem operation fails.
pub fn run_init(args: &InitArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let tack_dir = config::tack_dir(project_root);

    if tack_dir.exists() && !args.force {
        anyhow::bail!(".tack/ already exists. Use `tk init --force` to reinitialize.");
    }

    std::fs::create_dir_all(&tack_dir)
        .with_context(|| format!("Failed to create {}", tack_dir.display()))?;

    let config_path = tack_dir.join("config.toml");
    if !config_path.exists() || args.force {
        std::fs::write(&config_path, CONFIG_TOML)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
    }

    let gitignore_path = tack_dir.join(".gitignore");
    std::fs::write(&gitignore_path, GITIGNORE)
        .with_context(|| format!("Failed to write {}", gitignore_path.display()))?;

    // Creating the store also migrates it to the latest schema.
    let store_path = config::store_path(project_root);
    drop(Store::open(&store_path)?);

    tracing::info!(path = %tack_dir.display(), "initialized tack store");
    render_success(
        output,
        &format!("Initialized tack store in {}", tack_dir.display()),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{InitArgs, run_init};
    use crate::output::OutputMode;

    #[test]
    fn init_creates_skeleton_and_refuses_rerun() {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = InitArgs { force: false };

        run_init(&args, OutputMode::Text, dir.path()).expect("first init");
        assert!(dir.path().join(".tack/tack.db").exists());
        assert!(dir.path().join(".tack/config.toml").exists());
        assert!(dir.path().join(".tack/.gitignore").exists());

        let err = run_init(&args, OutputMode::Text, dir.path()).expect_err("second init");
        assert!(err.to_string().contains("--force"));

        let forced = InitArgs { force: true };
        run_init(&forced, OutputMode::Text, dir.path()).expect("forced init");
    }
}
