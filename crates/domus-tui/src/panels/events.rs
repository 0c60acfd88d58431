//! Event log panel — recent activity, newest first.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use domus_core::EventRecord;

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct EventsPanel {
    focused: bool,
    events: Arc<Vec<EventRecord>>,
    scroll: usize,
}

impl EventsPanel {
    pub fn new() -> Self {
        Self {
            focused: false,
            events: Arc::new(Vec::new()),
            scroll: 0,
        }
    }
}

impl Component for EventsPanel {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll = (self.scroll + 1).min(self.events.len().saturating_sub(1));
                Ok(None)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                Ok(None)
            }
            KeyCode::Char('g') => {
                self.scroll = 0;
                Ok(None)
            }
            KeyCode::Char('r') => Ok(Some(Action::RequestRefreshEvents)),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::EventsUpdated(events) = action {
            self.events = Arc::clone(events);
            self.scroll = self.scroll.min(self.events.len().saturating_sub(1));
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
            .title(format!(" Eventos ({}) ", self.events.len()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let visible = inner.height as usize;
        let lines = event_lines(&self.events, self.scroll, visible);
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

/// Rows for the visible window, newest first, timestamps verbatim.
fn event_lines(events: &[EventRecord], scroll: usize, visible: usize) -> Vec<Line<'static>> {
    if events.is_empty() {
        return vec![Line::from(Span::styled("  (sin eventos)", theme::row()))];
    }

    events
        .iter()
        .skip(scroll)
        .take(visible.max(1))
        .map(|event| {
            Line::from(vec![
                Span::styled(format!("{:<20}", event.timestamp), theme::key_hint()),
                Span::styled(format!("{:<10}", event.user), theme::row()),
                Span::styled(format!("{:<14}", event.action), theme::row()),
                Span::styled(format!("{:<14}", event.device_display()), theme::row()),
                Span::styled(event.extra_display().to_string(), theme::key_hint()),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn event(timestamp: &str, action: &str, device: Option<&str>) -> EventRecord {
        EventRecord {
            timestamp: timestamp.to_string(),
            user: "alice".to_string(),
            action: action.to_string(),
            device: device.map(str::to_string),
            extra: None,
        }
    }

    #[test]
    fn renders_in_given_order_with_verbatim_timestamps() {
        let events = vec![
            event("2024-03-02 10:05:00", "toggle", Some("Luz")),
            event("2024-03-02 10:00:00", "login", None),
        ];
        let lines = event_lines(&events, 0, 10);

        assert_eq!(lines.len(), 2);
        assert!(line_text(&lines[0]).starts_with("2024-03-02 10:05:00"));
        assert!(line_text(&lines[1]).contains("login"));
    }

    #[test]
    fn missing_device_renders_blank_not_placeholder_text() {
        let events = vec![event("2024-03-02 10:00:00", "login", None)];
        let text = line_text(&event_lines(&events, 0, 10)[0]);
        assert!(!text.contains("None"));
        assert!(!text.contains("null"));
    }

    #[test]
    fn rerender_of_same_events_is_identical() {
        let events = vec![
            event("2024-03-02 10:05:00", "toggle", Some("Luz")),
            event("2024-03-02 10:00:00", "login", None),
        ];
        let first: Vec<String> = event_lines(&events, 0, 10).iter().map(line_text).collect();
        let second: Vec<String> = event_lines(&events, 0, 10).iter().map(line_text).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn scroll_window_skips_rows() {
        let events: Vec<EventRecord> = (0..5)
            .map(|i| event(&format!("t{i}"), "toggle", Some("Luz")))
            .collect();
        let lines = event_lines(&events, 2, 2);
        assert_eq!(lines.len(), 2);
        assert!(line_text(&lines[0]).starts_with("t2"));
    }
}
