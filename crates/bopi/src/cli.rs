//! Clap derive structures for the `bopi` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// bopi -- read sensors and relays of a BoPi pool controller
#[derive(Debug, Parser)]
#[command(
    name = "bopi",
    version,
    about = "Monitor BoPi pool controllers from the command line",
    long_about = "Polls the local HTTP API of a BoPi pool controller and shows\n\
        its sensors (temperatures, pH, redox, ...) and relay states.",
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
    /// Controller profile to use
    #[arg(long, short = 'p', env = "BOPI_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "BOPI_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Controller host or IP address (overrides profile)
    #[arg(long, short = 'H', env = "BOPI_HOST", global = true)]
    pub host: Option<String>,

    /// Controller HTTP port (overrides profile)
    #[arg(long, env = "BOPI_PORT", global = true)]
    pub port: Option<u32>,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "BOPI_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "BOPI_OUTPUT",
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

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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
    /// Fetch once and show every sensor and relay
    #[command(alias = "st")]
    State(StateArgs),

    /// Read a single value by dotted path (e.g. relay1.status)
    Get(GetArgs),

    /// Poll continuously and print every refresh (Enter forces a refresh)
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Check that the controller settings work
    Validate,

    /// Relay control
    #[command(alias = "sw")]
    Switch(SwitchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),
}

// ── State / Get ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StateArgs {
    /// Print the raw sensors state instead of entity rows
    #[arg(long)]
    pub raw: bool,
}

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Dotted path into the sensors state
    pub path: String,
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Polling interval in seconds (minimum 10)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,

    /// Stop after this many updates
    #[arg(long, short = 'n')]
    pub count: Option<u64>,
}

// ── Switch ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SwitchArgs {
    #[command(subcommand)]
    pub command: SwitchCommand,
}

#[derive(Debug, Subcommand)]
pub enum SwitchCommand {
    /// Turn a relay on
    On {
        /// Switch key (pool_pump, pool_lights, relay1..relay4)
        key: String,
    },

    /// Turn a relay off
    Off {
        /// Switch key (pool_pump, pool_lights, relay1..relay4)
        key: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Add or replace a controller profile
    Init {
        /// Profile name
        #[arg(long, default_value = "default")]
        name: String,

        /// Controller host or IP address
        #[arg(long)]
        controller: String,

        /// Controller HTTP port
        #[arg(long)]
        controller_port: Option<u32>,

        /// Polling interval in seconds
        #[arg(long)]
        scan_interval: Option<u64>,

        /// Skip the connectivity check
        #[arg(long)]
        no_validate: bool,
    },

    /// Display the current configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Change a profile's polling interval
    SetInterval {
        /// Interval in seconds (minimum 10)
        seconds: u64,
    },
}
