// Wire types for the domus server's JSON API.
//
// Field names follow the wire format (Spanish sensor keys); struct fields
// are renamed to English via serde attributes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Full response of `GET /api/state`.
///
/// `devices` preserves the server's key order — the dashboard renders
/// devices in exactly the order the mapping provides.
#[derive(Debug, Clone, Deserialize)]
pub struct StateResponse {
    pub devices: IndexMap<String, bool>,
    pub sensors: SensorReadings,
    #[serde(default)]
    pub events: Vec<EventRecord>,
    pub user: String,
    pub role: String,
}

/// Point-in-time sensor readings from `/api/state`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReadings {
    #[serde(rename = "temperatura")]
    pub temperature: f64,
    #[serde(rename = "movimiento")]
    pub motion: bool,
    #[serde(rename = "puerta_abierta")]
    pub door_open: bool,
    #[serde(rename = "humo")]
    pub smoke: bool,
}

/// One audit-log entry, ordered newest-first by the server.
///
/// `timestamp` is the server's ISO-seconds string and is rendered
/// verbatim — no client-side parsing or reformatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub timestamp: String,
    pub user: String,
    pub action: String,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub extra: Option<String>,
}

impl EventRecord {
    /// Device column text — empty when the event has no device.
    pub fn device_display(&self) -> &str {
        self.device.as_deref().unwrap_or("")
    }

    /// Extra column text — empty when absent.
    pub fn extra_display(&self) -> &str {
        self.extra.as_deref().unwrap_or("")
    }
}

/// Envelope of `GET /api/events?limit=N`.
#[derive(Debug, Deserialize)]
pub(crate) struct EventsResponse {
    pub events: Vec<EventRecord>,
}

/// Response of every command endpoint: `{ok: true, ...}` on success,
/// `{error: "..."}` on an application-level rejection.
#[derive(Debug, Deserialize)]
pub(crate) struct CommandResponse {
    #[serde(default)]
    #[allow(dead_code)]
    pub ok: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
}
