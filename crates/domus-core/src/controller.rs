// ── Connection controller ──
//
// Owns the HTTP client, the store, and the background poll task.
// Cloneable handle; all clones share one inner state.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use domus_api::DomusClient;
use secrecy::ExposeSecret;

use crate::config::ClientConfig;
use crate::dispatch::CommandApi;
use crate::error::CoreError;
use crate::model::StateSnapshot;
use crate::store::DashboardStore;

/// Connection lifecycle, published over a watch channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

impl ConnectionState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug)]
struct ControllerInner {
    config: ClientConfig,
    client: DomusClient,
    store: Arc<DashboardStore>,
    connection_state: watch::Sender<ConnectionState>,
    cancel: CancellationToken,
    task_handles: tokio::sync::Mutex<Vec<JoinHandle<()>>>,
}

/// Handle to a dashboard connection.
#[derive(Debug, Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

impl Controller {
    pub fn new(config: ClientConfig) -> Result<Self, CoreError> {
        let client = DomusClient::new(config.url.clone(), config.timeout)?;
        Ok(Self {
            inner: Arc::new(ControllerInner {
                config,
                client,
                store: Arc::new(DashboardStore::new()),
                connection_state: watch::Sender::new(ConnectionState::Disconnected),
                cancel: CancellationToken::new(),
                task_handles: tokio::sync::Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn store(&self) -> Arc<DashboardStore> {
        Arc::clone(&self.inner.store)
    }

    pub fn connection_state(&self) -> ConnectionState {
        *self.inner.connection_state.borrow()
    }

    pub fn subscribe_connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    /// Log in, fetch the first snapshot, and start the poll loop.
    pub async fn connect(&self) -> Result<(), CoreError> {
        let inner = &self.inner;
        inner
            .connection_state
            .send_replace(ConnectionState::Connecting);

        let login = inner
            .client
            .login(&inner.config.username, inner.config.password.expose_secret())
            .await;
        if let Err(err) = login {
            inner.connection_state.send_replace(ConnectionState::Failed);
            return Err(err.into());
        }

        if let Err(err) = self.full_refresh().await {
            inner.connection_state.send_replace(ConnectionState::Failed);
            return Err(err);
        }

        if inner.config.polling_enabled() {
            let handle = tokio::spawn(poll_task(self.clone()));
            inner.task_handles.lock().await.push(handle);
        }

        inner
            .connection_state
            .send_replace(ConnectionState::Connected);
        info!(url = %inner.config.url, user = %inner.config.username, "connected");
        Ok(())
    }

    /// Stop polling and drop cached state.
    pub async fn disconnect(&self) {
        let inner = &self.inner;
        inner.cancel.cancel();
        for handle in inner.task_handles.lock().await.drain(..) {
            let _ = handle.await;
        }
        inner.store.clear();
        inner
            .connection_state
            .send_replace(ConnectionState::Disconnected);
        debug!("disconnected");
    }

    /// Fetch a full state snapshot and apply it to the store.
    pub async fn full_refresh(&self) -> Result<(), CoreError> {
        let inner = &self.inner;
        let generation = inner.store.begin_refresh();
        let response = inner.client.fetch_state().await?;
        let snapshot = StateSnapshot::from(response);
        if !inner.store.apply_state(generation, snapshot) {
            debug!(generation, "refresh superseded before it landed");
        }
        Ok(())
    }

    /// Fetch the event log (up to `limit` entries) and apply it.
    pub async fn events_refresh(&self, limit: u32) -> Result<(), CoreError> {
        let inner = &self.inner;
        let generation = inner.store.begin_refresh();
        let events = inner.client.fetch_events(limit).await?;
        if !inner.store.apply_events(generation, events) {
            debug!(generation, "events refresh superseded before it landed");
        }
        Ok(())
    }

    /// Download the full event log as CSV, verbatim from the server.
    pub async fn export_events(&self) -> Result<String, CoreError> {
        Ok(self.inner.client.export_events().await?)
    }

    /// Connect, run one operation, and disconnect. Polling is forced
    /// off; this is the one-shot path used by the CLI.
    pub async fn oneshot<T, F, Fut>(config: ClientConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Controller) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let controller = Controller::new(config.without_polling())?;
        controller.connect().await?;
        let result = f(controller.clone()).await;
        controller.disconnect().await;
        result
    }
}

/// Background refresh loop. First interval tick fires immediately and
/// is consumed up front; the initial snapshot already came from
/// `connect`.
async fn poll_task(controller: Controller) {
    let cancel = controller.inner.cancel.clone();
    let mut interval = tokio::time::interval(controller.inner.config.poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval.tick().await;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(err) = controller.full_refresh().await {
                    warn!(error = %err, "background refresh failed");
                }
            }
        }
    }
    debug!("poll task stopped");
}

#[async_trait]
impl CommandApi for Controller {
    async fn toggle(&self, device: &str, state: bool) -> Result<(), CoreError> {
        self.inner.client.toggle(device, state).await?;
        Ok(())
    }

    async fn set_mode(&self, mode: &str) -> Result<(), CoreError> {
        self.inner.client.set_mode(mode).await?;
        Ok(())
    }

    async fn add_device(&self, name: &str) -> Result<(), CoreError> {
        self.inner.client.add_device(name).await?;
        Ok(())
    }

    async fn delete_device(&self, name: &str) -> Result<(), CoreError> {
        self.inner.client.delete_device(name).await?;
        Ok(())
    }

    async fn refresh_state(&self) -> Result<(), CoreError> {
        self.full_refresh().await
    }

    async fn refresh_events(&self, limit: u32) -> Result<(), CoreError> {
        self.events_refresh(limit).await
    }
}
