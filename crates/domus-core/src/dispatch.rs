// ── Command dispatch ──
//
// User intents (toggle, mode change, device admin) funneled through one
// place: validation and confirmation happen here, then the command goes
// out, then state is re-fetched so the UI catches up without waiting
// for the next poll. Server rejections become user-visible messages,
// never crashes.

use async_trait::async_trait;
use tracing::error;

use crate::error::CoreError;

/// Default number of events requested by log refreshes.
pub const DEFAULT_EVENT_LIMIT: u32 = 50;

/// User interaction seam: confirmation prompts and one-line notices.
///
/// The CLI backs this with an interactive prompt; the TUI routes it
/// through its modal/toast machinery; tests record calls.
pub trait Prompt: Send + Sync {
    /// Ask a yes/no question. `false` aborts the command.
    fn confirm(&self, message: &str) -> bool;
    /// Surface a one-line notice (validation failures, server errors).
    fn notify(&self, message: &str);
}

/// The command surface a dispatcher drives. Implemented by
/// [`Controller`](crate::Controller); mocked in tests.
#[async_trait]
pub trait CommandApi: Send + Sync {
    async fn toggle(&self, device: &str, state: bool) -> Result<(), CoreError>;
    async fn set_mode(&self, mode: &str) -> Result<(), CoreError>;
    async fn add_device(&self, name: &str) -> Result<(), CoreError>;
    async fn delete_device(&self, name: &str) -> Result<(), CoreError>;
    async fn refresh_state(&self) -> Result<(), CoreError>;
    async fn refresh_events(&self, limit: u32) -> Result<(), CoreError>;
}

#[async_trait]
impl<T: CommandApi + ?Sized> CommandApi for &T {
    async fn toggle(&self, device: &str, state: bool) -> Result<(), CoreError> {
        (**self).toggle(device, state).await
    }
    async fn set_mode(&self, mode: &str) -> Result<(), CoreError> {
        (**self).set_mode(mode).await
    }
    async fn add_device(&self, name: &str) -> Result<(), CoreError> {
        (**self).add_device(name).await
    }
    async fn delete_device(&self, name: &str) -> Result<(), CoreError> {
        (**self).delete_device(name).await
    }
    async fn refresh_state(&self) -> Result<(), CoreError> {
        (**self).refresh_state().await
    }
    async fn refresh_events(&self, limit: u32) -> Result<(), CoreError> {
        (**self).refresh_events(limit).await
    }
}

#[async_trait]
impl<T: CommandApi + ?Sized> CommandApi for std::sync::Arc<T> {
    async fn toggle(&self, device: &str, state: bool) -> Result<(), CoreError> {
        (**self).toggle(device, state).await
    }
    async fn set_mode(&self, mode: &str) -> Result<(), CoreError> {
        (**self).set_mode(mode).await
    }
    async fn add_device(&self, name: &str) -> Result<(), CoreError> {
        (**self).add_device(name).await
    }
    async fn delete_device(&self, name: &str) -> Result<(), CoreError> {
        (**self).delete_device(name).await
    }
    async fn refresh_state(&self) -> Result<(), CoreError> {
        (**self).refresh_state().await
    }
    async fn refresh_events(&self, limit: u32) -> Result<(), CoreError> {
        (**self).refresh_events(limit).await
    }
}

/// Routes user commands through validation, confirmation, execution,
/// and the follow-up refresh.
pub struct Dispatcher<A, P> {
    api: A,
    prompt: P,
}

impl<A: CommandApi, P: Prompt> Dispatcher<A, P> {
    pub fn new(api: A, prompt: P) -> Self {
        Self { api, prompt }
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    /// Ask the server to switch `device` to `state`.
    pub async fn toggle_device(&self, device: &str, state: bool) {
        let result = self.api.toggle(device, state).await;
        self.finish_command(result).await;
    }

    /// Switch the operating mode (e.g. "seguridad", "ahorro").
    pub async fn set_mode(&self, mode: &str) {
        let result = self.api.set_mode(mode).await;
        self.finish_command(result).await;
    }

    /// Register a new device. Returns `true` only when the server
    /// accepted it (the caller can close its input field); local
    /// validation failures and server rejections leave the input for
    /// another try.
    pub async fn add_device(&self, raw_name: &str) -> bool {
        let name = raw_name.trim();
        if name.is_empty() {
            self.prompt.notify("Ingresá un nombre de dispositivo");
            return false;
        }
        let result = self.api.add_device(name).await;
        self.finish_command(result).await
    }

    /// Delete a device, after explicit confirmation.
    pub async fn delete_device(&self, name: &str) {
        let question = format!("¿Seguro que querés eliminar el dispositivo \"{name}\"?");
        if !self.prompt.confirm(&question) {
            return;
        }
        let result = self.api.delete_device(name).await;
        self.finish_command(result).await;
    }

    /// Re-fetch the event log at the default depth.
    pub async fn refresh_events(&self) {
        if let Err(err) = self.api.refresh_events(DEFAULT_EVENT_LIMIT).await {
            error!(error = %err, "events refresh failed");
        }
    }

    /// Shared tail of every command: surface a rejection, or pull fresh
    /// state so the outcome is visible immediately. Returns whether the
    /// command itself succeeded.
    async fn finish_command(&self, result: Result<(), CoreError>) -> bool {
        match result {
            Ok(()) => {
                if let Err(err) = self.api.refresh_state().await {
                    error!(error = %err, "post-command refresh failed");
                }
                true
            }
            Err(CoreError::Rejected { message }) => {
                self.prompt.notify(&format!("Error: {message}"));
                false
            }
            // Transport and parse failures stay in the log; the next
            // poll cycle retries.
            Err(err) => {
                error!(error = %err, "command failed");
                false
            }
        }
    }
}
