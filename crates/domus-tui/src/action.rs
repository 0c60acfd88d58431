//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::sync::Arc;

use domus_core::{Device, EventRecord, SensorSnapshot, Session};

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A toast notification shown in the status bar.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Info,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Focus ──────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,

    // ── Data Events (from domus-core watches) ──────────────────────
    DevicesUpdated(Arc<Vec<Device>>),
    SensorsUpdated(Option<SensorSnapshot>),
    EventsUpdated(Arc<Vec<EventRecord>>),
    SessionUpdated(Option<Session>),

    // ── Connection Status ──────────────────────────────────────────
    Connecting,
    Connected,
    Disconnected(String),

    // ── Command Requests (forwarded to the data bridge) ────────────
    RequestToggle { device: String, state: bool },
    RequestSetMode(String),
    RequestAddDevice(String),
    /// Delete already confirmed by the modal.
    RequestDeleteDevice(String),
    RequestRefreshEvents,

    // ── Confirm Dialog ─────────────────────────────────────────────
    ShowConfirmDelete { device: String },
    ConfirmYes,
    ConfirmNo,

    // ── Add-Device Input ───────────────────────────────────────────
    OpenAddDevice,
    CloseAddDevice,
    /// Whether the submitted name passed validation and was sent.
    AddDeviceResult { accepted: bool },

    // ── Notifications ──────────────────────────────────────────────
    Notify(Notification),
    DismissNotification,
}
