//! Device command handlers.

use tabled::Tabled;

use domus_core::{CommandApi, Device};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "STATE")]
    state: &'static str,
}

pub async fn handle(args: DevicesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List => {
            let devices = util::with_controller(global, |controller| async move {
                Ok(controller.store().devices().as_ref().clone())
            })
            .await?;

            let rendered = output::render_list(
                &global.output,
                &devices,
                |d: &Device| DeviceRow {
                    name: d.name.clone(),
                    state: d.state_label(),
                },
                |d| d.name.clone(),
            );
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        DevicesCommand::On { name } => set_state(global, &name, true).await,
        DevicesCommand::Off { name } => set_state(global, &name, false).await,

        DevicesCommand::Toggle { name } => {
            let state = util::with_controller(global, |controller| async move {
                // Flip relative to the freshly fetched state.
                let devices = controller.store().devices();
                let state = devices
                    .iter()
                    .find(|d| d.name == name)
                    .map(Device::desired_state);
                if let Some(state) = state {
                    controller.toggle(&name, state).await?;
                }
                Ok((name, state))
            })
            .await
            .and_then(|(name, state)| {
                state.ok_or_else(|| CliError::Validation {
                    field: "device".into(),
                    reason: format!("no device named '{name}'"),
                })
            })?;

            report(global, if state { "Encendido" } else { "Apagado" });
            Ok(())
        }

        DevicesCommand::Add { name } => {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(CliError::Validation {
                    field: "name".into(),
                    reason: "device name must not be empty".into(),
                });
            }
            util::with_controller(global, |controller| async move {
                controller.add_device(&name).await
            })
            .await?;
            report(global, "Device added");
            Ok(())
        }

        DevicesCommand::Delete { name } => {
            if !util::confirm(&format!("Delete device '{name}'?"), global.yes)? {
                return Ok(());
            }
            util::with_controller(global, |controller| async move {
                controller.delete_device(&name).await
            })
            .await?;
            report(global, "Device deleted");
            Ok(())
        }
    }
}

async fn set_state(global: &GlobalOpts, name: &str, state: bool) -> Result<(), CliError> {
    let name = name.to_string();
    util::with_controller(global, |controller| async move {
        controller.toggle(&name, state).await
    })
    .await?;
    report(global, if state { "Encendido" } else { "Apagado" });
    Ok(())
}

fn report(global: &GlobalOpts, message: &str) {
    if !global.quiet {
        eprintln!("{message}");
    }
}
