//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod events;
pub mod mode;
pub mod status;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        // Config commands don't need a server connection
        Command::Config(args) => config_cmd::handle(args, global),

        Command::Status => status::handle(global).await,
        Command::Devices(args) => devices::handle(args, global).await,
        Command::Mode { mode } => mode::handle(&mode, global).await,
        Command::Events(args) => events::handle(args, global).await,
    }
}
