//! Clap derive structures for the `gatefleet` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use gatefleet_core::UserType;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// gatefleet -- control point for access-control gate devices
#[derive(Debug, Parser)]
#[command(
    name = "gatefleet",
    version,
    about = "Manage a fleet of access-control gate devices",
    long_about = "Registers gate devices, keeps the central user database and\n\
        replicates it to every connected device. Run `gatefleet serve` for the\n\
        HTTP API; the other commands work directly on the snapshot files.",
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
    /// Snapshot directory (overrides config)
    #[arg(long, short = 'd', env = "GATEFLEET_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "GATEFLEET_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Log format (overrides config)
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
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
    /// YAML
    Yaml,
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API and the auto-sync worker
    Serve(ServeArgs),

    /// Manage registered gate devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Manage the central user database
    #[command(alias = "u")]
    Users(UsersArgs),

    /// Show or change global gate settings
    Settings(SettingsArgs),

    /// Push the database to one device or the whole fleet
    Sync(SyncArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Serve ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Listen address (overrides config)
    #[arg(long, short = 'b', env = "GATEFLEET_BIND")]
    pub bind: Option<String>,
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List registered devices
    #[command(alias = "ls")]
    List,

    /// Show one device
    Get {
        /// Device ID
        id: String,
    },

    /// Register a device and probe it
    Add {
        /// Display name
        #[arg(long)]
        name: String,

        /// Host, host:port or URL of the device
        #[arg(long, alias = "ip")]
        endpoint: String,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Remove a device from the registry
    #[command(alias = "rm")]
    Remove {
        /// Device ID
        id: String,
    },

    /// Make a device the active one
    Activate {
        /// Device ID
        id: String,
    },

    /// Re-probe a device; on success its clock is set and the database pushed
    Retry {
        /// Device ID
        id: String,
    },

    /// Push the current time to a connected device
    SyncTime {
        /// Device ID
        id: String,
    },

    /// Probe the active device
    Status,
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List users
    #[command(alias = "ls")]
    List,

    /// Add a user
    Add {
        /// Card UID
        uid: String,

        #[arg(long)]
        name: String,

        /// Starting credit (defaults to the configured default credit)
        #[arg(long)]
        credit: Option<i64>,

        /// STATIC or DYNAMIC
        #[arg(long = "type")]
        user_type: Option<UserType>,
    },

    /// Update fields of a user
    Update {
        /// Card UID
        uid: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        credit: Option<i64>,

        /// STATIC or DYNAMIC
        #[arg(long = "type")]
        user_type: Option<UserType>,

        /// Whether the holder is currently inside
        #[arg(long = "inside")]
        inside: Option<bool>,
    },

    /// Remove a user
    #[command(alias = "rm")]
    Remove {
        /// Card UID
        uid: String,
    },

    /// Add to (or, with a negative amount, subtract from) a user's credit
    Credit {
        /// Card UID
        uid: String,

        #[arg(allow_hyphen_values = true)]
        amount: i64,
    },
}

// ── Settings ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show settings
    Show,

    /// Change one or more settings
    Set {
        #[arg(long)]
        cost_per_exit: Option<i64>,

        #[arg(long)]
        default_credit: Option<i64>,

        #[arg(long)]
        admin_mode: Option<bool>,
    },
}

// ── Sync ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
#[command(group(clap::ArgGroup::new("target").required(true).args(["id", "all"])))]
pub struct SyncArgs {
    /// Device ID
    pub id: Option<String>,

    /// Push to every registered device
    #[arg(long)]
    pub all: bool,
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

    /// Print the config file path
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
