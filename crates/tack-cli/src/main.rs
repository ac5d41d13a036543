#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use output::OutputMode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "tack: planning-board card tracker",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (defaults to pretty on a TTY, text when piped).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output (alias for --format json).
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Initialize a tack store",
        long_about = "Create .tack/ with the SQLite store and default config.",
        after_help = "EXAMPLES:\n    tk init\n    tk init --force"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        about = "Create a card at the tail of a lane",
        after_help = "EXAMPLES:\n    tk add --title \"Write launch post\"\n    tk add --title \"Ship beta\" --lane in_progress --board bd-xyz --priority high"
    )]
    Add(cmd::add::AddArgs),

    #[command(
        about = "List cards ordered by board, lane, rank",
        after_help = "EXAMPLES:\n    tk ls\n    tk ls --lane review --format json"
    )]
    Ls(cmd::list::LsArgs),

    #[command(
        about = "Move a card to a new rank, lane, or board",
        long_about = "Move a card. The destination rank is zero-based and means \
\"insert before the card currently at this rank\"; a lane's size appends at \
its tail. Every other card in the affected lane(s) keeps a dense rank \
sequence.",
        after_help = "EXAMPLES:\n    tk move cd-abc --to 0\n    tk move cd-abc --lane done --to 2\n    tk move cd-abc --board none --to 1"
    )]
    Move(cmd::move_cmd::MoveArgs),

    #[command(about = "Show one card")]
    Show(cmd::show::ShowArgs),

    #[command(about = "Edit a card's payload (never its position)")]
    Update(cmd::update::UpdateArgs),

    #[command(about = "Soft-delete a card")]
    Rm(cmd::delete::RmArgs),

    #[command(about = "Restore a soft-deleted card at its lane's tail")]
    Restore(cmd::delete::RestoreArgs),

    #[command(subcommand, about = "Manage boards (the board list is ranked too)")]
    Board(cmd::board::BoardCommand),

    #[command(about = "Audit rank contiguity across every partition")]
    Check(cmd::check::CheckArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = output::resolve_output_mode(cli.format, cli.json);
    let project_root = std::env::current_dir()?;

    match &cli.command {
        Commands::Init(args) => cmd::init::run_init(args, output, &project_root),
        Commands::Add(args) => cmd::add::run_add(args, output, &project_root),
        Commands::Ls(args) => cmd::list::run_list(args, output, &project_root),
        Commands::Move(args) => cmd::move_cmd::run_move(args, output, &project_root),
        Commands::Show(args) => cmd::show::run_show(args, output, &project_root),
        Commands::Update(args) => cmd::update::run_update(args, output, &project_root),
        Commands::Rm(args) => cmd::delete::run_rm(args, output, &project_root),
        Commands::Restore(args) => cmd::delete::run_restore(args, output, &project_root),
        Commands::Board(command) => cmd::board::run_board(command, output, &project_root),
        Commands::Check(args) => cmd::check::run_check(args, output, &project_root),
    }
}
