//! Mode command handler.

use domus_core::CommandApi;

use crate::cli::GlobalOpts;
use crate::error::CliError;

use super::util;

/// Switch the operating mode. Mode names are server-defined
/// ("seguridad", "ahorro", …); an unknown one comes back as a rejection.
pub async fn handle(mode: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let mode = mode.to_string();
    let applied = mode.clone();
    util::with_controller(global, |controller| async move {
        controller.set_mode(&mode).await
    })
    .await?;

    if !global.quiet {
        eprintln!("Mode set to {applied}");
    }
    Ok(())
}
