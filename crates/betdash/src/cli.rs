//! Clap derive structures for the `betdash` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// betdash -- terminal client for the betting-bot dashboard
#[derive(Debug, Parser)]
#[command(
    name = "betdash",
    version,
    about = "Follow the betting bot's dashboard from the command line",
    long_about = "Streams the bot's live logs over the dashboard's WebSocket and\n\
        prints the data behind each dashboard view.",
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
    /// Dashboard profile to use
    #[arg(long, short = 'p', env = "BETDASH_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Dashboard URL (overrides profile)
    #[arg(long, short = 'd', env = "BETDASH_DASHBOARD", global = true)]
    pub dashboard: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "BETDASH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "BETDASH_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "BETDASH_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Stream the bot's live logs
    #[command(alias = "l")]
    Logs(LogsArgs),

    /// List the dashboard's routes
    Routes,

    /// Resolve a dashboard path and print its view data
    #[command(alias = "v")]
    View(ViewArgs),

    /// Check the dashboard backend's health endpoint
    Health,

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Logs ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LogsArgs {
    /// Stop after this many log lines from the bot (markers not counted)
    #[arg(long, short = 'n')]
    pub count: Option<usize>,

    /// Do not print connection markers
    #[arg(long)]
    pub no_markers: bool,
}

// ── View ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ViewArgs {
    /// Dashboard path, e.g. `/teams`
    #[arg(default_value = "/")]
    pub path: String,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Write a starter configuration file (uses --dashboard if given)
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
