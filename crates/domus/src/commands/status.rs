//! Status command handler: the whole dashboard in one view.

use owo_colors::OwoColorize;
use serde::Serialize;

use domus_core::{Device, SensorSnapshot};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct StatusView {
    user: String,
    role: String,
    sensors: Option<SensorSnapshot>,
    devices: Vec<Device>,
}

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let view = util::with_controller(global, |controller| async move {
        let store = controller.store();
        let session = store.session();
        Ok(StatusView {
            user: session.as_ref().map(|s| s.user.clone()).unwrap_or_default(),
            role: session
                .as_ref()
                .map(|s| s.role.to_string())
                .unwrap_or_default(),
            sensors: store.sensors(),
            devices: store.devices().as_ref().clone(),
        })
    })
    .await?;

    let rendered = output::render_single(
        &global.output,
        &view,
        render_detail,
        |v| format!("{} ({})", v.user, v.role),
    );
    output::print_output(&rendered, global.quiet);
    Ok(())
}

fn render_detail(view: &StatusView) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} {} ({})",
        "Session:".bold(),
        view.user,
        view.role
    ));

    match &view.sensors {
        Some(s) => {
            lines.push(format!("{}", "Sensors:".bold()));
            lines.push(format!("  Temperatura: {} °C", s.temperature_display()));
            lines.push(format!("  Movimiento:  {}", s.motion_label()));
            lines.push(format!("  Puerta:      {}", s.door_label()));
            lines.push(format!("  Humo:        {}", s.smoke_label()));
        }
        None => lines.push("Sensors: (no data)".into()),
    }

    lines.push(format!("{}", "Devices:".bold()));
    if view.devices.is_empty() {
        lines.push("  (none)".into());
    }
    for device in &view.devices {
        let state = if device.on {
            device.state_label().green().to_string()
        } else {
            device.state_label().red().to_string()
        };
        lines.push(format!("  {:<20} {}", device.name, state));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use domus_core::Role;

    use super::*;

    #[test]
    fn detail_view_includes_sensors_and_devices() {
        let view = StatusView {
            user: "alice".into(),
            role: "admin".into(),
            sensors: Some(SensorSnapshot {
                temperature: 21.0,
                motion: false,
                door_open: false,
                smoke: false,
            }),
            devices: vec![
                Device { name: "Luz Living".into(), on: true },
                Device { name: "Ventilador".into(), on: false },
            ],
        };
        let text = render_detail(&view);

        assert!(text.contains("alice"));
        assert!(text.contains("Temperatura: 21 °C"));
        assert!(text.contains("Luz Living"));
        assert!(text.contains("ENCENDIDO"));
        assert!(text.contains("APAGADO"));
    }

    #[test]
    fn detail_view_handles_missing_data() {
        let view = StatusView {
            user: "bob".into(),
            role: Role::new("user").to_string(),
            sensors: None,
            devices: Vec::new(),
        };
        let text = render_detail(&view);
        assert!(text.contains("(no data)"));
        assert!(text.contains("(none)"));
    }
}
