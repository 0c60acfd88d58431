// domus-core: Reactive data layer between domus-api and consumers (CLI/TUI).

pub mod config;
pub mod controller;
pub mod convert;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::ClientConfig;
pub use controller::{ConnectionState, Controller};
pub use dispatch::{CommandApi, Dispatcher, Prompt, DEFAULT_EVENT_LIMIT};
pub use error::CoreError;
pub use store::DashboardStore;

// Re-export model types at the crate root for ergonomics.
pub use model::{Device, EventRecord, Role, SensorSnapshot, Session, StateSnapshot};
