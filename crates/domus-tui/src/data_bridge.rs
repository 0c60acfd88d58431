//! Data bridge — connects [`Controller`] streams to TUI actions.
//!
//! Runs as a background task: subscribes to the store's watch channels
//! and the connection state, forwarding every change as an [`Action`]
//! through the TUI's action channel. Also drains the UI command channel,
//! executing each command through the core [`Dispatcher`] so validation,
//! rejection messages, and the post-command refresh behave exactly like
//! every other client.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use domus_core::{ConnectionState, Controller, Dispatcher, Prompt};

use crate::action::{Action, Notification};

/// Commands the UI sends to the bridge for execution.
#[derive(Debug, Clone)]
pub enum UiCommand {
    Toggle { device: String, state: bool },
    SetMode(String),
    AddDevice(String),
    /// The confirm modal already ran; delete unconditionally.
    DeleteDevice(String),
    RefreshEvents,
}

/// Prompt backed by the action channel. Confirmation happens in the UI
/// before a command is ever sent, so `confirm` always passes; notices
/// become toast notifications.
struct BridgePrompt {
    action_tx: mpsc::UnboundedSender<Action>,
}

impl Prompt for BridgePrompt {
    fn confirm(&self, _message: &str) -> bool {
        true
    }

    fn notify(&self, message: &str) {
        let _ = self
            .action_tx
            .send(Action::Notify(Notification::error(message)));
    }
}

/// Spawn the data bridge connecting [`Controller`] streams to the TUI.
///
/// Connects to the server, pushes initial snapshots, then loops
/// forwarding every store change, connection transition, and UI command
/// until cancelled.
pub async fn run_data_bridge(
    controller: Controller,
    action_tx: mpsc::UnboundedSender<Action>,
    mut command_rx: mpsc::UnboundedReceiver<UiCommand>,
    cancel: CancellationToken,
) {
    let _ = action_tx.send(Action::Connecting);

    if let Err(e) = controller.connect().await {
        warn!(error = %e, "failed to connect to server");
        let _ = action_tx.send(Action::Disconnected(e.to_string()));
        return;
    }
    let _ = action_tx.send(Action::Connected);

    let store = controller.store();
    let mut devices = store.subscribe_devices();
    let mut sensors = store.subscribe_sensors();
    let mut events = store.subscribe_events();
    let mut session = store.subscribe_session();
    let mut conn_state = controller.subscribe_connection_state();

    // Push initial snapshots so panels have data immediately
    let _ = action_tx.send(Action::DevicesUpdated(store.devices()));
    let _ = action_tx.send(Action::SensorsUpdated(store.sensors()));
    let _ = action_tx.send(Action::EventsUpdated(store.events()));
    let _ = action_tx.send(Action::SessionUpdated(store.session()));

    let dispatcher = Dispatcher::new(
        controller.clone(),
        BridgePrompt {
            action_tx: action_tx.clone(),
        },
    );

    // Stream loop — forward every change until cancelled
    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Some(command) = command_rx.recv() => {
                handle_command(&dispatcher, &action_tx, command).await;
            }

            Ok(()) = devices.changed() => {
                let snapshot = devices.borrow_and_update().clone();
                let _ = action_tx.send(Action::DevicesUpdated(snapshot));
            }
            Ok(()) = sensors.changed() => {
                let snapshot = *sensors.borrow_and_update();
                let _ = action_tx.send(Action::SensorsUpdated(snapshot));
            }
            Ok(()) = events.changed() => {
                let snapshot = events.borrow_and_update().clone();
                let _ = action_tx.send(Action::EventsUpdated(snapshot));
            }
            Ok(()) = session.changed() => {
                let snapshot = session.borrow_and_update().clone();
                let _ = action_tx.send(Action::SessionUpdated(snapshot));
            }
            Ok(()) = conn_state.changed() => {
                let state = *conn_state.borrow_and_update();
                match state {
                    ConnectionState::Connected => {
                        let _ = action_tx.send(Action::Connected);
                    }
                    ConnectionState::Disconnected => {
                        let _ = action_tx.send(Action::Disconnected("disconnected".into()));
                    }
                    ConnectionState::Failed => {
                        let _ = action_tx.send(Action::Disconnected("connection failed".into()));
                    }
                    ConnectionState::Connecting => {
                        let _ = action_tx.send(Action::Connecting);
                    }
                }
            }
        }
    }

    controller.disconnect().await;
    debug!("data bridge shut down");
}

async fn handle_command(
    dispatcher: &Dispatcher<Controller, BridgePrompt>,
    action_tx: &mpsc::UnboundedSender<Action>,
    command: UiCommand,
) {
    debug!(?command, "executing UI command");
    match command {
        UiCommand::Toggle { device, state } => {
            dispatcher.toggle_device(&device, state).await;
        }
        UiCommand::SetMode(mode) => {
            dispatcher.set_mode(&mode).await;
        }
        UiCommand::AddDevice(name) => {
            let accepted = dispatcher.add_device(&name).await;
            let _ = action_tx.send(Action::AddDeviceResult { accepted });
        }
        UiCommand::DeleteDevice(name) => {
            dispatcher.delete_device(&name).await;
        }
        UiCommand::RefreshEvents => {
            dispatcher.refresh_events().await;
        }
    }
}
