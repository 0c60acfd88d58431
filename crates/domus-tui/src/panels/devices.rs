//! Devices panel — list, toggle, add, delete.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use domus_core::Device;

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct DevicesPanel {
    focused: bool,
    devices: Arc<Vec<Device>>,
    selected: usize,
    /// Whether the session may delete devices.
    is_admin: bool,
}

impl DevicesPanel {
    pub fn new() -> Self {
        Self {
            focused: false,
            devices: Arc::new(Vec::new()),
            selected: 0,
            is_admin: false,
        }
    }

    fn selected_device(&self) -> Option<&Device> {
        self.devices.get(self.selected)
    }

    fn clamp_selection(&mut self) {
        if self.devices.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.devices.len() {
            self.selected = self.devices.len() - 1;
        }
    }
}

impl Component for DevicesPanel {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected + 1 < self.devices.len() {
                    self.selected += 1;
                }
                Ok(None)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                Ok(None)
            }
            // Flip the selected device to the opposite state
            KeyCode::Enter | KeyCode::Char('t') => {
                Ok(self.selected_device().map(|d| Action::RequestToggle {
                    device: d.name.clone(),
                    state: d.desired_state(),
                }))
            }
            KeyCode::Char('n') => Ok(Some(Action::OpenAddDevice)),
            KeyCode::Char('x') | KeyCode::Delete if self.is_admin => {
                Ok(self.selected_device().map(|d| Action::ShowConfirmDelete {
                    device: d.name.clone(),
                }))
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::DevicesUpdated(devices) => {
                // Full replacement, selection clamped to the new list.
                self.devices = Arc::clone(devices);
                self.clamp_selection();
            }
            Action::SessionUpdated(session) => {
                self.is_admin = session.as_ref().is_some_and(|s| s.role.is_admin());
            }
            _ => {}
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
            .title(" Dispositivos ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = device_lines(&self.devices, self.selected, self.is_admin);
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

/// One line per device: selection marker, name, state, and the action
/// the toggle key would take (always the inverse of the current state).
fn device_lines(devices: &[Device], selected: usize, is_admin: bool) -> Vec<Line<'static>> {
    if devices.is_empty() {
        return vec![Line::from(Span::styled("  (sin dispositivos)", theme::row()))];
    }

    let mut lines: Vec<Line> = devices
        .iter()
        .enumerate()
        .map(|(i, device)| {
            let marker = if i == selected { "▶ " } else { "  " };
            let name_style = if i == selected {
                theme::row_selected()
            } else {
                theme::row()
            };
            let state_style = if device.on {
                theme::state_on()
            } else {
                theme::state_off()
            };
            Line::from(vec![
                Span::styled(marker.to_string(), name_style),
                Span::styled(format!("{:<20}", device.name), name_style),
                Span::styled(format!("{:<10}", device.state_label()), state_style),
                Span::styled(format!("[{}]", device.toggle_label()), theme::key_hint()),
            ])
        })
        .collect();

    let mut hints = String::from("  t encender/apagar  n nuevo");
    if is_admin {
        hints.push_str("  x eliminar");
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(hints, theme::key_hint())));
    lines
}
