//! Event log command handlers.

use tabled::Tabled;

use domus_core::EventRecord;

use crate::cli::{EventsArgs, EventsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "TIMESTAMP")]
    timestamp: String,
    #[tabled(rename = "USER")]
    user: String,
    #[tabled(rename = "ACTION")]
    action: String,
    #[tabled(rename = "DEVICE")]
    device: String,
    #[tabled(rename = "EXTRA")]
    extra: String,
}

pub async fn handle(args: EventsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        EventsCommand::List { limit } => {
            let events = util::with_controller(global, |controller| async move {
                controller.events_refresh(limit).await?;
                Ok(controller.store().events().as_ref().clone())
            })
            .await?;

            let rendered = output::render_list(
                &global.output,
                &events,
                |e: &EventRecord| EventRow {
                    timestamp: e.timestamp.clone(),
                    user: e.user.clone(),
                    action: e.action.clone(),
                    device: e.device_display().to_string(),
                    extra: e.extra_display().to_string(),
                },
                |e| format!("{}\t{}\t{}", e.timestamp, e.user, e.action),
            );
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        EventsCommand::Export { file } => {
            let csv = util::with_controller(global, |controller| async move {
                controller.export_events().await
            })
            .await?;

            match file {
                Some(path) => {
                    std::fs::write(&path, &csv)?;
                    if !global.quiet {
                        eprintln!("Wrote {}", path.display());
                    }
                }
                None => output::print_output(csv.trim_end(), global.quiet),
            }
            Ok(())
        }
    }
}
