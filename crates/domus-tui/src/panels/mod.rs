//! Dashboard panels: devices, sensors, event log.

pub mod devices;
pub mod events;
pub mod sensors;

pub use devices::DevicesPanel;
pub use events::EventsPanel;
pub use sensors::SensorsPanel;
