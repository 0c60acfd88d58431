// ── Wire → domain conversions ──

use domus_api::types::{SensorReadings, StateResponse};

use crate::model::{Device, Role, SensorSnapshot, Session, StateSnapshot};

impl From<SensorReadings> for SensorSnapshot {
    fn from(r: SensorReadings) -> Self {
        Self {
            temperature: r.temperature,
            motion: r.motion,
            door_open: r.door_open,
            smoke: r.smoke,
        }
    }
}

impl From<StateResponse> for StateSnapshot {
    fn from(resp: StateResponse) -> Self {
        let devices = resp
            .devices
            .into_iter()
            .map(|(name, on)| Device { name, on })
            .collect();

        Self {
            devices,
            sensors: resp.sensors.into(),
            events: resp.events,
            session: Session {
                user: resp.user,
                role: Role::from(resp.role),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_response_conversion_keeps_device_order() {
        let json = r#"{
            "devices": {"b": true, "a": false},
            "sensors": {"temperatura": 19.5, "movimiento": true, "puerta_abierta": false, "humo": false},
            "events": [],
            "user": "alice",
            "role": "admin"
        }"#;
        let resp: StateResponse = serde_json::from_str(json).expect("parse");
        let snap: StateSnapshot = resp.into();

        let names: Vec<&str> = snap.devices.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
        assert!(snap.devices[0].on);
        assert_eq!(snap.sensors.temperature, 19.5);
        assert!(snap.session.role.is_admin());
    }
}
