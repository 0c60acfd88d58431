//! Shared helpers for command handlers.

use domus_core::{ClientConfig, Controller, CoreError};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the client config and run one operation against a connected
/// controller.
pub async fn with_controller<T, F, Fut>(global: &GlobalOpts, f: F) -> Result<T, CliError>
where
    F: FnOnce(Controller) -> Fut,
    Fut: std::future::Future<Output = Result<T, CoreError>>,
{
    let config: ClientConfig = crate::config::resolve_client_config(global)?;
    Ok(Controller::oneshot(config, f).await?)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}
