//! Clap derive structures for the `domus` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// domus -- command-line client for the domus home dashboard
#[derive(Debug, Parser)]
#[command(
    name = "domus",
    version,
    about = "Control your home dashboard from the command line",
    long_about = "A CLI for the domus home-automation server.\n\n\
        Reads the same state the web dashboard shows (devices, sensors,\n\
        event log) and sends the same commands (toggle, mode, device admin).",
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
    /// Server profile to use
    #[arg(long, short = 'p', env = "DOMUS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Server URL (overrides profile)
    #[arg(long, short = 's', env = "DOMUS_SERVER", global = true)]
    pub server: Option<String>,

    /// Login username (overrides profile)
    #[arg(long, short = 'u', env = "DOMUS_USERNAME", global = true)]
    pub username: Option<String>,

    /// Environment variable to read the password from
    #[arg(long, global = true)]
    pub password_env: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "DOMUS_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds
    #[arg(long, env = "DOMUS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output Enum ──────────────────────────────────────────────────────

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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the full dashboard state (sensors, devices, session)
    #[command(alias = "st")]
    Status,

    /// Manage devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Switch the operating mode (e.g. seguridad, ahorro)
    Mode {
        /// Mode name, as the server understands it
        mode: String,
    },

    /// View and export the event log
    #[command(alias = "ev")]
    Events(EventsArgs),

    /// Manage configuration profiles
    Config(ConfigArgs),
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List devices with their current state
    #[command(alias = "ls")]
    List,

    /// Turn a device on
    On {
        /// Device name
        name: String,
    },

    /// Turn a device off
    Off {
        /// Device name
        name: String,
    },

    /// Flip a device to the opposite of its current state
    Toggle {
        /// Device name
        name: String,
    },

    /// Register a new device (admin only)
    Add {
        /// Device name
        name: String,
    },

    /// Remove a device (admin only, asks for confirmation)
    #[command(alias = "rm")]
    Delete {
        /// Device name
        name: String,
    },
}

// ── Events ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: EventsCommand,
}

#[derive(Debug, Subcommand)]
pub enum EventsCommand {
    /// List recent events, newest first
    #[command(alias = "ls")]
    List {
        /// Maximum number of events
        #[arg(long, short = 'n', default_value = "50")]
        limit: u32,
    },

    /// Download the full event log as CSV
    Export {
        /// Write to a file instead of stdout
        #[arg(long, short = 'f')]
        file: Option<PathBuf>,
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
    /// Print the resolved configuration (passwords omitted)
    Show,

    /// Print the config file path
    Path,

    /// Write a starter config file with one profile
    Init {
        /// Server base URL
        #[arg(long)]
        server: String,

        /// Login username
        #[arg(long)]
        username: String,

        /// Profile name
        #[arg(long, default_value = "default")]
        name: String,
    },

    /// Choose which profile is used when --profile is not given
    SetDefault {
        /// Profile name (must already exist)
        profile: String,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
