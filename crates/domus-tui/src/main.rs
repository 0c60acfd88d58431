//! `domus-tui` — terminal dashboard for the domus home-automation server.
//!
//! Built on [ratatui](https://ratatui.rs) with reactive data from
//! `domus-core`'s watch channels. One screen, three panels: devices,
//! sensors, and the event log, refreshed continuously by the background
//! poll loop.
//!
//! Logs are written to a file (default `/tmp/domus-tui.log`) to avoid
//! corrupting the terminal UI. A background data bridge task streams
//! store updates from the controller into the TUI action loop and runs
//! UI commands through the shared dispatcher.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and
//! app launch.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod panels;
mod theme;
mod tui;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use secrecy::SecretString;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use domus_core::{ClientConfig, Controller};

use crate::app::App;

/// Terminal dashboard for the domus home-automation server.
#[derive(Parser, Debug)]
#[command(name = "domus-tui", version, about)]
struct Cli {
    /// Server URL (e.g., http://192.168.1.50:8080)
    #[arg(short = 's', long, env = "DOMUS_SERVER")]
    server: Option<String>,

    /// Login username
    #[arg(short = 'u', long, env = "DOMUS_USERNAME")]
    username: Option<String>,

    /// Config profile to use instead of flags
    #[arg(short = 'p', long, env = "DOMUS_PROFILE")]
    profile: Option<String>,

    /// Log file path
    #[arg(long, default_value = "/tmp/domus-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that
/// would corrupt the TUI output. Returns a guard that must be held for
/// the lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("domus_tui={log_level},domus_core={log_level}")));

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("domus-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Build a [`ClientConfig`] from CLI flags, if a server was given.
fn config_from_flags(cli: &Cli) -> Result<Option<ClientConfig>> {
    let Some(server) = cli.server.as_deref() else {
        return Ok(None);
    };
    let url: url::Url = server
        .parse()
        .map_err(|_| eyre!("invalid server URL: {server}"))?;
    let username = cli
        .username
        .clone()
        .ok_or_else(|| eyre!("--username is required with --server"))?;
    let password = std::env::var("DOMUS_PASSWORD")
        .map(SecretString::from)
        .map_err(|_| eyre!("set DOMUS_PASSWORD when using --server"))?;
    Ok(Some(ClientConfig::new(url, username, password)))
}

/// Build a [`ClientConfig`] from the shared config file.
fn config_from_file(cli: &Cli) -> Result<ClientConfig> {
    let cfg = domus_config::load_config()?;
    let (name, profile) = cfg.profile(cli.profile.as_deref())?;
    Ok(domus_config::profile_to_client_config(
        profile,
        name,
        &cfg.defaults,
    )?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    // Priority: CLI flags > config file profile
    let config = match config_from_flags(&cli)? {
        Some(config) => config,
        None => config_from_file(&cli)?,
    };

    info!(url = %config.url, user = %config.username, "starting domus-tui");

    let controller = Controller::new(config).map_err(|e| eyre!(e.to_string()))?;

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let mut app = App::new(command_tx);

    let cancel = CancellationToken::new();
    let bridge = tokio::spawn(data_bridge::run_data_bridge(
        controller,
        app.action_sender(),
        command_rx,
        cancel.clone(),
    ));

    let result = app.run().await;

    cancel.cancel();
    let _ = bridge.await;

    result
}
