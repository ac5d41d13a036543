//! `tk board` — board management; the board list is itself ranked.

use super::{engine_result, open_project_store};
use crate::output::{OutputMode, render_item, render_list, render_success};
use clap::{Args, Subcommand};
use std::path::Path;

#[derive(Subcommand, Debug)]
pub enum BoardCommand {
    /// Create a board at the tail of the board list.
    Add(BoardAddArgs),
    /// List boards ordered by rank.
    Ls(BoardLsArgs),
    /// Move a board to a new rank.
    Move(BoardMoveArgs),
    /// Rename a board (rank untouched).
    Rename(BoardRenameArgs),
    /// Soft-delete a board; its cards keep their orderings.
    Rm(BoardRmArgs),
    /// Restore a soft-deleted board at the tail of the list.
    Restore(BoardRestoreArgs),
}

#[derive(Args, Debug)]
pub struct BoardAddArgs {
    /// Board name.
    pub name: String,
}

#[derive(Args, Debug)]
pub struct BoardLsArgs {
    /// Include soft-deleted boards.
    #[arg(long)]
    pub deleted: bool,
}

#[derive(Args, Debug)]
pub struct BoardMoveArgs {
    /// Board id.
    pub id: String,

    /// Destination rank (zero-based).
    #[arg(long)]
    pub to: i64,
}

#[derive(Args, Debug)]
pub struct BoardRenameArgs {
    /// Board id.
    pub id: String,

    /// New name.
    pub name: String,
}

#[derive(Args, Debug)]
pub struct BoardRmArgs {
    /// Board id.
    pub id: String,
}

#[derive(Args, Debug)]
pub struct BoardRestoreArgs {
    /// Board id.
    pub id: String,
}

pub fn run_board(
    command: &BoardCommand,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let mut store = open_project_store(project_root, output)?;
    match command {
        BoardCommand::Add(args) => {
            let board = engine_result(store.create_board(&args.name), output)?;
            render_item(&board, output)?;
        }
        BoardCommand::Ls(args) => {
            let boards = store.boards(args.deleted)?;
            render_list(&boards, output)?;
        }
        BoardCommand::Move(args) => {
            let boards = engine_result(store.move_board(&args.id, args.to), output)?;
            render_list(&boards, output)?;
        }
        BoardCommand::Rename(args) => {
            let board = engine_result(store.rename_board(&args.id, &args.name), output)?;
            render_item(&board, output)?;
        }
        BoardCommand::Rm(args) => {
            let board = engine_result(store.delete_board(&args.id), output)?;
            render_success(output, &format!("Deleted {} ({})", board.id, board.name))?;
        }
        BoardCommand::Restore(args) => {
            let board = engine_result(store.restore_board(&args.id), output)?;
            render_item(&board, output)?;
        }
    }
    Ok(())
}
