// ── Domain types for the dashboard ──
//
// Display labels are Spanish, matching the server's own web dashboard,
// so the TUI and CLI read the same as the web UI.

use serde::Serialize;

pub use domus_api::types::EventRecord;

/// A controllable device: name plus on/off state.
///
/// Devices carry no identity beyond name equality; the whole list is
/// replaced on every refresh, in server order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    pub name: String,
    pub on: bool,
}

impl Device {
    /// Current-state indicator: "ENCENDIDO" when on, "APAGADO" when off.
    pub fn state_label(&self) -> &'static str {
        if self.on { "ENCENDIDO" } else { "APAGADO" }
    }

    /// Label of the toggle control — always the *inverse* transition:
    /// "Apagar" when the device is on, "Encender" when off.
    pub fn toggle_label(&self) -> &'static str {
        if self.on { "Apagar" } else { "Encender" }
    }

    /// The state a toggle request should ask for.
    pub fn desired_state(&self) -> bool {
        !self.on
    }
}

/// Point-in-time sensor readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorSnapshot {
    pub temperature: f64,
    pub motion: bool,
    pub door_open: bool,
    pub smoke: bool,
}

impl SensorSnapshot {
    /// Temperature rendered as-is (the server already rounds it).
    pub fn temperature_display(&self) -> String {
        format!("{}", self.temperature)
    }

    pub fn motion_label(&self) -> &'static str {
        if self.motion { "Detectado" } else { "No" }
    }

    pub fn door_label(&self) -> &'static str {
        if self.door_open { "Abierta" } else { "Cerrada" }
    }

    pub fn smoke_label(&self) -> &'static str {
        if self.smoke { "Humo detectado" } else { "Normal" }
    }
}

/// A user role. The set is open-ended server-side; the only value with
/// client-side meaning is `"admin"`, which unlocks device deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub const ADMIN: &'static str = "admin";

    pub fn new(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    /// Whether this role unlocks the delete affordance.
    pub fn is_admin(&self) -> bool {
        self.0 == Self::ADMIN
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        Self(role)
    }
}

/// The logged-in identity attached to every state response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user: String,
    pub role: Role,
}

/// A complete dashboard snapshot, as applied to the store in one unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSnapshot {
    pub devices: Vec<Device>,
    pub sensors: SensorSnapshot,
    pub events: Vec<EventRecord>,
    pub session: Session,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_label_is_inverse_of_state() {
        let on = Device { name: "luz".into(), on: true };
        assert_eq!(on.state_label(), "ENCENDIDO");
        assert_eq!(on.toggle_label(), "Apagar");
        assert!(!on.desired_state());

        let off = Device { name: "luz".into(), on: false };
        assert_eq!(off.state_label(), "APAGADO");
        assert_eq!(off.toggle_label(), "Encender");
        assert!(off.desired_state());
    }

    #[test]
    fn sensor_labels_match_the_web_dashboard() {
        let s = SensorSnapshot {
            temperature: 21.0,
            motion: false,
            door_open: false,
            smoke: false,
        };
        assert_eq!(s.temperature_display(), "21");
        assert_eq!(s.motion_label(), "No");
        assert_eq!(s.door_label(), "Cerrada");
        assert_eq!(s.smoke_label(), "Normal");

        let s = SensorSnapshot {
            temperature: 23.4,
            motion: true,
            door_open: true,
            smoke: true,
        };
        assert_eq!(s.temperature_display(), "23.4");
        assert_eq!(s.motion_label(), "Detectado");
        assert_eq!(s.door_label(), "Abierta");
        assert_eq!(s.smoke_label(), "Humo detectado");
    }

    #[test]
    fn only_admin_role_is_elevated() {
        assert!(Role::new("admin").is_admin());
        assert!(!Role::new("user").is_admin());
        assert!(!Role::new("Admin").is_admin());
        assert!(!Role::new("").is_admin());
    }
}
