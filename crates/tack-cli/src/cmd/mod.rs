//! One module per subcommand, all sharing the store-opening and
//! error-rendering helpers below.

pub mod add;
pub mod board;
pub mod check;
pub mod delete;
pub mod init;
pub mod list;
pub mod move_cmd;
pub mod show;
pub mod update;

use crate::output::{CliError, OutputMode, render_error};
use std::path::Path;
use std::str::FromStr;
use tack_core::{ErrorCode, Lane, Priority, Store, StoreOptions, config};

/// Open the project store, failing with a `tk init` hint when missing.
pub(crate) fn open_project_store(
    project_root: &Path,
    output: OutputMode,
) -> anyhow::Result<Store> {
    let project = match config::load_project_config(project_root) {
        Ok(project) => project,
        Err(err) => {
            render_error(
                output,
                &CliError::new(err.to_string(), ErrorCode::ConfigParseError),
            )?;
            return Err(err);
        }
    };
    let options = StoreOptions {
        busy_timeout: project.store.busy_timeout(),
    };
    let path = config::store_path(project_root);
    match Store::try_open(&path, &options)? {
        Some(store) => Ok(store),
        None => {
            let message = format!("no tack store found at {}", path.display());
            render_error(output, &CliError::new(&message, ErrorCode::NotInitialized))?;
            anyhow::bail!("{message}. Run `tk init` first.")
        }
    }
}

/// Unwrap an engine result, rendering the typed error before failing.
pub(crate) fn engine_result<T>(
    result: tack_core::Result<T>,
    output: OutputMode,
) -> anyhow::Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err) => {
            render_error(output, &CliError::from_engine(&err))?;
            anyhow::bail!("{err}")
        }
    }
}

/// Parse a lane argument, rendering the unknown-lane error on failure.
pub(crate) fn parse_lane(raw: &str, output: OutputMode) -> anyhow::Result<Lane> {
    match Lane::from_str(raw) {
        Ok(lane) => Ok(lane),
        Err(err) => {
            render_error(output, &CliError::new(err.to_string(), ErrorCode::UnknownLane))?;
            anyhow::bail!("{err}")
        }
    }
}

/// Parse a priority argument.
pub(crate) fn parse_priority(raw: &str) -> anyhow::Result<Priority> {
    Priority::from_str(raw).map_err(|err| anyhow::anyhow!(err))
}

/// Parse an RFC 3339 due date into stored microseconds.
pub(crate) fn parse_due(raw: &str) -> anyhow::Result<i64> {
    let parsed = chrono::DateTime::parse_from_rfc3339(raw)
        .map_err(|err| anyhow::anyhow!("invalid due date '{raw}': {err} (expected RFC 3339)"))?;
    Ok(parsed.timestamp_micros())
}
