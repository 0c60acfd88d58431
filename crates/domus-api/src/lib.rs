// domus-api: Raw HTTP client for the domus home-automation server.
//
// Wraps the server's JSON API (`/api/state`, `/api/toggle`, `/api/mode`,
// `/api/events`, `/api/admin/*`) plus the form-based session login.
// `domus-core` builds the reactive data layer on top of this crate.

pub mod client;
pub mod error;
pub mod types;

pub use client::DomusClient;
pub use error::Error;
pub use types::{EventRecord, SensorReadings, StateResponse};
