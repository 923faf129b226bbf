//! Clap derive structures for the `stagehand` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

use stagehand_api::TimerOperation;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// stagehand -- watch and control ProPresenter
#[derive(Debug, Parser)]
#[command(
    name = "stagehand",
    version,
    about = "Watch and control ProPresenter from the command line",
    long_about = "Keeps a live view of a ProPresenter instance through its Remote Control API.\n\n\
        Slow-changing data (macros, timers, playlists) is polled; presentation state\n\
        is streamed from /v1/status/updates.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Profile to use
    #[arg(long, short = 'p', env = "STAGEHAND_PROFILE", global = true)]
    pub profile: Option<String>,

    /// ProPresenter host (overrides profile)
    #[arg(long, short = 'H', env = "STAGEHAND_HOST", global = true)]
    pub host: Option<String>,

    /// Remote Control API port (overrides profile)
    #[arg(long, env = "STAGEHAND_PORT", global = true)]
    pub port: Option<u16>,

    /// Request timeout in seconds
    #[arg(long, env = "STAGEHAND_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(long, short = 'o', env = "STAGEHAND_OUTPUT", default_value = "pretty", global = true)]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Log line format
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

// ── Output Enums ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Pretty,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print both snapshots once
    #[command(alias = "st")]
    Status,

    /// Stream live updates until interrupted
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Select a look by name
    Look(LookArgs),

    /// Show a message, optionally filling its tokens
    #[command(alias = "msg")]
    Message(MessageArgs),

    /// Hide a message
    MessageClear(MessageClearArgs),

    /// Start, stop or reset a timer
    Timer(TimerArgs),

    /// Trigger the next slide
    Next,

    /// Trigger the previous slide
    #[command(alias = "prev")]
    Previous,

    /// Drop cached playlist details and refetch them
    RefreshCache,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Only print these topics (e.g. status/layers); repeatable
    #[arg(long, short = 't')]
    pub topic: Vec<String>,
}

#[derive(Debug, Args)]
pub struct LookArgs {
    /// Look name
    pub name: String,
}

#[derive(Debug, Args)]
pub struct MessageArgs {
    /// Message name or UUID
    pub message: String,

    /// Token value as NAME=TEXT; repeatable
    #[arg(long = "token", short = 't', value_parser = parse_token)]
    pub tokens: Vec<(String, String)>,
}

#[derive(Debug, Args)]
pub struct MessageClearArgs {
    /// Message name or UUID
    pub message: String,
}

#[derive(Debug, Args)]
pub struct TimerArgs {
    /// Timer name or UUID
    pub timer: String,

    /// Operation to perform
    pub operation: TimerAction,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TimerAction {
    Start,
    Stop,
    Reset,
}

impl From<TimerAction> for TimerOperation {
    fn from(action: TimerAction) -> Self {
        match action {
            TimerAction::Start => Self::Start,
            TimerAction::Stop => Self::Stop,
            TimerAction::Reset => Self::Reset,
        }
    }
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

fn parse_token(raw: &str) -> Result<(String, String), String> {
    let (name, text) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=TEXT, got '{raw}'"))?;
    if name.is_empty() {
        return Err("token name must not be empty".into());
    }
    Ok((name.to_owned(), text.to_owned()))
}
