//! Shared output layer for pretty/text/JSON parity across all CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its output
//! accordingly: pretty output for humans, compact text for pipes and agents,
//! or stable JSON.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format` / hidden `--json` flag
//! 2. `FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 3. `output` in the user config file
//! 4. Default: [`OutputMode::Pretty`] if stdout is a TTY, text if piped.

use clap::ValueEnum;
use serde::Serialize;
use std::io::{self, IsTerminal, Write};
use tack_core::{Board, Card, RankViolation};

/// Shared width for human pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 64;

/// Write a horizontal separator used by pretty human output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<10} {}", format!("{key}:"), value.as_ref())
}

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized output (sections, visual framing).
    Pretty,
    /// Token-efficient plain text for agents and pipes.
    Text,
    /// Machine-readable JSON (one object per result, or a JSON array).
    Json,
}

impl OutputMode {
    /// Returns `true` if JSON output was requested.
    pub fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

fn parse_mode(raw: &str) -> Option<OutputMode> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pretty" => Some(OutputMode::Pretty),
        "text" => Some(OutputMode::Text),
        "json" => Some(OutputMode::Json),
        _ => None,
    }
}

/// Core resolution logic, separated from I/O for testability.
fn resolve_output_mode_inner(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    format_env: Option<&str>,
    user_pref: Option<&str>,
    is_tty: bool,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }
    if json_flag {
        return OutputMode::Json;
    }
    if let Some(mode) = format_env.and_then(parse_mode) {
        return mode;
    }
    if let Some(mode) = user_pref.and_then(parse_mode) {
        return mode;
    }
    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

/// Resolve the output mode from CLI flags, environment, user config, and TTY
/// detection.
pub fn resolve_output_mode(format_flag: Option<OutputMode>, json_flag: bool) -> OutputMode {
    let env_val = std::env::var("FORMAT").ok();
    let user_pref = tack_core::config::load_user_config()
        .map(|config| config.output)
        .unwrap_or_default();
    let is_tty = io::stdout().is_terminal();
    resolve_output_mode_inner(
        format_flag,
        json_flag,
        env_val.as_deref(),
        user_pref.as_deref(),
        is_tty,
    )
}

/// Trait implemented by any CLI result type that can be rendered in all
/// modes. JSON comes from the `Serialize` bound; pretty and text are
/// hand-written per type.
pub trait Renderable: Serialize {
    /// Render for human consumption: labeled lines.
    fn render_pretty(&self, w: &mut dyn Write) -> io::Result<()>;

    /// Render one compact line for pipes.
    fn render_text(&self, w: &mut dyn Write) -> io::Result<()>;
}

/// Render a single item in the given mode.
pub fn render_item<T: Renderable>(item: &T, mode: OutputMode) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut w = stdout.lock();
    match mode {
        OutputMode::Json => writeln!(w, "{}", serde_json::to_string_pretty(item)?)?,
        OutputMode::Pretty => item.render_pretty(&mut w)?,
        OutputMode::Text => item.render_text(&mut w)?,
    }
    Ok(())
}

/// Render a list: a JSON array in JSON mode, one block or line per item
/// otherwise.
pub fn render_list<T: Renderable>(items: &[T], mode: OutputMode) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut w = stdout.lock();
    match mode {
        OutputMode::Json => writeln!(w, "{}", serde_json::to_string_pretty(items)?)?,
        OutputMode::Pretty => {
            for item in items {
                item.render_pretty(&mut w)?;
                pretty_rule(&mut w)?;
            }
            writeln!(w, "{} item(s)", items.len())?;
        }
        OutputMode::Text => {
            for item in items {
                item.render_text(&mut w)?;
            }
        }
    }
    Ok(())
}

/// Structured error surface with the stable engine error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>, code: tack_core::ErrorCode) -> Self {
        Self {
            error: message.into(),
            code: code.code().to_string(),
            hint: code.hint().map(ToString::to_string),
        }
    }

    pub fn from_engine(err: &tack_core::Error) -> Self {
        Self::new(err.to_string(), err.code())
    }
}

/// Render an error to stderr (stdout in JSON mode, so pipelines see one
/// stream of machine-readable objects).
pub fn render_error(mode: OutputMode, err: &CliError) -> io::Result<()> {
    if mode.is_json() {
        let payload = serde_json::to_string(err).unwrap_or_else(|_| {
            format!("{{\"error\":\"{}\",\"code\":\"{}\"}}", err.error, err.code)
        });
        writeln!(io::stdout(), "{payload}")
    } else {
        let mut stderr = io::stderr().lock();
        writeln!(stderr, "error[{}]: {}", err.code, err.error)?;
        if let Some(hint) = &err.hint {
            writeln!(stderr, "  hint: {hint}")?;
        }
        Ok(())
    }
}

/// Render a success message (a `{"ok": ...}` object in JSON mode).
pub fn render_success(mode: OutputMode, message: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    if mode.is_json() {
        writeln!(stdout, "{}", serde_json::json!({ "ok": message }))
    } else {
        writeln!(stdout, "{message}")
    }
}

fn fmt_us(us: Option<i64>) -> String {
    us.and_then(chrono::DateTime::<chrono::Utc>::from_timestamp_micros)
        .map_or_else(|| "-".to_string(), |ts| ts.format("%Y-%m-%d %H:%M").to_string())
}

impl Renderable for Card {
    fn render_pretty(&self, w: &mut dyn Write) -> io::Result<()> {
        pretty_kv(w, "card", &self.id)?;
        pretty_kv(w, "title", &self.title)?;
        pretty_kv(
            w,
            "board",
            self.board_id.as_deref().unwrap_or("(unfiled)"),
        )?;
        pretty_kv(w, "lane", self.lane.to_string())?;
        pretty_kv(w, "rank", self.rank.to_string())?;
        pretty_kv(w, "priority", self.priority.to_string())?;
        if let Some(assignee) = &self.assignee {
            pretty_kv(w, "assignee", assignee)?;
        }
        if self.due_at_us.is_some() {
            pretty_kv(w, "due", fmt_us(self.due_at_us))?;
        }
        if let Some(body) = &self.body {
            pretty_kv(w, "body", body)?;
        }
        if self.is_deleted {
            pretty_kv(w, "deleted", fmt_us(self.deleted_at_us))?;
        }
        pretty_kv(w, "updated", fmt_us(Some(self.updated_at_us)))?;
        Ok(())
    }

    fn render_text(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}",
            self.id,
            self.board_id.as_deref().unwrap_or("-"),
            self.lane,
            self.rank,
            self.title,
        )
    }
}

impl Renderable for Board {
    fn render_pretty(&self, w: &mut dyn Write) -> io::Result<()> {
        pretty_kv(w, "board", &self.id)?;
        pretty_kv(w, "name", &self.name)?;
        pretty_kv(w, "rank", self.rank.to_string())?;
        if self.is_deleted {
            pretty_kv(w, "deleted", fmt_us(self.deleted_at_us))?;
        }
        pretty_kv(w, "updated", fmt_us(Some(self.updated_at_us)))?;
        Ok(())
    }

    fn render_text(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}\t{}\t{}", self.id, self.rank, self.name)
    }
}

impl Renderable for RankViolation {
    fn render_pretty(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{self}")
    }

    fn render_text(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}\t{}\t{:?}", self.table, self.scope, self.ranks)
    }
}
