//! Sensors panel — temperature, motion, door, smoke.

use color_eyre::eyre::Result;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use domus_core::SensorSnapshot;

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct SensorsPanel {
    focused: bool,
    sensors: Option<SensorSnapshot>,
}

impl SensorsPanel {
    pub fn new() -> Self {
        Self {
            focused: false,
            sensors: None,
        }
    }
}

impl Component for SensorsPanel {
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::SensorsUpdated(sensors) = action {
            self.sensors = *sensors;
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let border = if self.focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .title(" Sensores ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        frame.render_widget(Paragraph::new(sensor_lines(self.sensors.as_ref())), inner);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

/// Four labeled readings, with placeholders until the first snapshot.
fn sensor_lines(sensors: Option<&SensorSnapshot>) -> Vec<Line<'static>> {
    let Some(s) = sensors else {
        return ["Temperatura", "Movimiento", "Puerta", "Humo"]
            .iter()
            .map(|label| {
                Line::from(vec![
                    Span::styled(format!("  {label:<13}"), theme::row()),
                    Span::styled("--", theme::key_hint()),
                ])
            })
            .collect();
    };

    let calm = theme::state_on();
    let alert = theme::state_alert();

    vec![
        Line::from(vec![
            Span::styled("  Temperatura  ", theme::row()),
            Span::styled(format!("{} °C", s.temperature_display()), theme::row()),
        ]),
        Line::from(vec![
            Span::styled("  Movimiento   ", theme::row()),
            Span::styled(
                s.motion_label().to_string(),
                if s.motion { alert } else { calm },
            ),
        ]),
        Line::from(vec![
            Span::styled("  Puerta       ", theme::row()),
            Span::styled(
                s.door_label().to_string(),
                if s.door_open { alert } else { calm },
            ),
        ]),
        Line::from(vec![
            Span::styled("  Humo         ", theme::row()),
            Span::styled(
                s.smoke_label().to_string(),
                if s.smoke { alert } else { calm },
            ),
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn placeholders_before_first_snapshot() {
        let lines = sensor_lines(None);
        assert_eq!(lines.len(), 4);
        for line in &lines {
            assert!(line_text(line).contains("--"));
        }
    }

    #[test]
    fn quiet_house_renders_calm_labels() {
        let s = SensorSnapshot {
            temperature: 21.0,
            motion: false,
            door_open: false,
            smoke: false,
        };
        let texts: Vec<String> = sensor_lines(Some(&s)).iter().map(line_text).collect();

        assert!(texts[0].contains("21 °C"));
        assert!(texts[1].ends_with("No"));
        assert!(texts[2].ends_with("Cerrada"));
        assert!(texts[3].ends_with("Normal"));
    }

    #[test]
    fn alarms_render_alert_labels() {
        let s = SensorSnapshot {
            temperature: 28.3,
            motion: true,
            door_open: true,
            smoke: true,
        };
        let texts: Vec<String> = sensor_lines(Some(&s)).iter().map(line_text).collect();

        assert!(texts[0].contains("28.3 °C"));
        assert!(texts[1].ends_with("Detectado"));
        assert!(texts[2].ends_with("Abierta"));
        assert!(texts[3].ends_with("Humo detectado"));
    }
}
