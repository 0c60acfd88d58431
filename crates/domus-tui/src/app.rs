//! Application core — event loop, panel focus, action dispatch, overlays.

use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tokio::sync::mpsc;
use tracing::info;

use domus_core::Session;

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::data_bridge::UiCommand;
use crate::event::{Event, EventReader};
use crate::panels::{DevicesPanel, EventsPanel, SensorsPanel};
use crate::theme;
use crate::tui::Tui;

/// How many ticks a toast stays visible (ticks fire at 4 Hz).
const TOAST_TICKS: u8 = 20;

/// Connection status as seen by the TUI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Top-level application state and event loop.
pub struct App {
    /// Panels in focus order: devices, sensors, events.
    panels: Vec<Box<dyn Component>>,
    focus: usize,
    running: bool,
    connection_status: ConnectionStatus,
    session: Option<Session>,
    /// Device name awaiting delete confirmation.
    pending_delete: Option<String>,
    /// Add-device input buffer, when the overlay is open.
    add_input: Option<String>,
    /// Current toast and its remaining ticks.
    notification: Option<(Notification, u8)>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    command_tx: mpsc::UnboundedSender<UiCommand>,
}

impl App {
    pub fn new(command_tx: mpsc::UnboundedSender<UiCommand>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let panels: Vec<Box<dyn Component>> = vec![
            Box::new(DevicesPanel::new()),
            Box::new(SensorsPanel::new()),
            Box::new(EventsPanel::new()),
        ];

        Self {
            panels,
            focus: 0,
            running: true,
            connection_status: ConnectionStatus::default(),
            session: None,
            pending_delete: None,
            add_input: None,
            notification: None,
            action_tx,
            action_rx,
            command_tx,
        }
    }

    /// Sender for the data bridge to push actions through.
    pub fn action_sender(&self) -> mpsc::UnboundedSender<Action> {
        self.action_tx.clone()
    }

    /// Run the main event loop. This is the heart of the TUI.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        for panel in &mut self.panels {
            panel.init(self.action_tx.clone())?;
        }
        self.panels[self.focus].set_focused(true);

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => {
                    self.action_tx.send(Action::Resize(w, h))?;
                }
                Event::Tick => {
                    self.action_tx.send(Action::Tick)?;
                }
                Event::Render => {
                    self.action_tx.send(Action::Render)?;
                }
            }

            // Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Overlays take priority, then global
    /// keys, then the focused panel.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Add-device input captures everything while open
        if let Some(buffer) = &mut self.add_input {
            return Ok(match key.code {
                KeyCode::Esc => Some(Action::CloseAddDevice),
                KeyCode::Enter => Some(Action::RequestAddDevice(buffer.clone())),
                KeyCode::Backspace => {
                    buffer.pop();
                    None
                }
                KeyCode::Char(c) => {
                    buffer.push(c);
                    None
                }
                _ => None,
            });
        }

        // Confirm modal: only yes/no
        if self.pending_delete.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y') | KeyCode::Enter => Some(Action::ConfirmYes),
                KeyCode::Char('n') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }

        // Global keybindings
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),

            (KeyModifiers::NONE, KeyCode::Esc) if self.notification.is_some() => {
                return Ok(Some(Action::DismissNotification));
            }

            (KeyModifiers::NONE, KeyCode::Tab) => return Ok(Some(Action::FocusNext)),
            (KeyModifiers::SHIFT, KeyCode::BackTab) => return Ok(Some(Action::FocusPrev)),

            // Operating modes, as the dashboard exposes them
            (KeyModifiers::NONE, KeyCode::Char('1')) => {
                return Ok(Some(Action::RequestSetMode("seguridad".into())));
            }
            (KeyModifiers::NONE, KeyCode::Char('2')) => {
                return Ok(Some(Action::RequestSetMode("ahorro".into())));
            }

            _ => {}
        }

        self.panels[self.focus].handle_key_event(key)
    }

    /// Process a single action — update app state and propagate to panels.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::FocusNext => self.move_focus(1),
            Action::FocusPrev => self.move_focus(self.panels.len() - 1),

            Action::Connecting => {
                self.connection_status = ConnectionStatus::Connecting;
            }
            Action::Connected => {
                if self.connection_status != ConnectionStatus::Connected {
                    self.show_toast(Notification::info("conectado"));
                }
                self.connection_status = ConnectionStatus::Connected;
            }
            Action::Disconnected(reason) => {
                self.connection_status = ConnectionStatus::Disconnected;
                self.show_toast(Notification::error(reason.clone()));
            }

            Action::SessionUpdated(session) => {
                self.session = session.clone();
                self.propagate(action)?;
            }

            // ── Command requests → data bridge ─────────────────────
            Action::RequestToggle { device, state } => {
                let _ = self.command_tx.send(UiCommand::Toggle {
                    device: device.clone(),
                    state: *state,
                });
            }
            Action::RequestSetMode(mode) => {
                let _ = self.command_tx.send(UiCommand::SetMode(mode.clone()));
            }
            Action::RequestAddDevice(name) => {
                let _ = self.command_tx.send(UiCommand::AddDevice(name.clone()));
            }
            Action::RequestDeleteDevice(name) => {
                let _ = self.command_tx.send(UiCommand::DeleteDevice(name.clone()));
            }
            Action::RequestRefreshEvents => {
                let _ = self.command_tx.send(UiCommand::RefreshEvents);
            }

            // ── Confirm dialog ─────────────────────────────────────
            Action::ShowConfirmDelete { device } => {
                self.pending_delete = Some(device.clone());
            }
            Action::ConfirmYes => {
                if let Some(device) = self.pending_delete.take() {
                    self.action_tx.send(Action::RequestDeleteDevice(device))?;
                }
            }
            Action::ConfirmNo => {
                self.pending_delete = None;
            }

            // ── Add-device input ───────────────────────────────────
            Action::OpenAddDevice => {
                self.add_input = Some(String::new());
            }
            Action::CloseAddDevice => {
                self.add_input = None;
            }
            Action::AddDeviceResult { accepted } => {
                // Validation failures keep the overlay open for another try.
                if *accepted {
                    self.add_input = None;
                }
            }

            // ── Notifications ──────────────────────────────────────
            Action::Notify(notification) => {
                self.show_toast(notification.clone());
            }
            Action::DismissNotification => {
                self.notification = None;
            }

            Action::Tick => {
                if let Some((_, ticks)) = &mut self.notification {
                    *ticks = ticks.saturating_sub(1);
                    if *ticks == 0 {
                        self.notification = None;
                    }
                }
            }

            // Render is handled in the main loop; resize needs no state here
            Action::Render | Action::Resize(..) => {}

            // Propagate data updates to every panel
            other => self.propagate(other)?,
        }

        Ok(())
    }

    fn propagate(&mut self, action: &Action) -> Result<()> {
        for panel in &mut self.panels {
            if let Some(follow_up) = panel.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    fn move_focus(&mut self, step: usize) {
        self.panels[self.focus].set_focused(false);
        self.focus = (self.focus + step) % self.panels.len();
        self.panels[self.focus].set_focused(true);
    }

    fn show_toast(&mut self, notification: Notification) {
        self.notification = Some((notification, TOAST_TICKS));
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([
            Constraint::Length(1), // Header
            Constraint::Min(1),    // Panels
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        self.render_header(frame, layout[0]);
        self.render_panels(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        if let Some(device) = &self.pending_delete {
            self.render_confirm_overlay(frame, area, device);
        }
        if let Some(buffer) = &self.add_input {
            self.render_add_overlay(frame, area, buffer);
        }
    }

    fn render_panels(&self, frame: &mut Frame, area: Rect) {
        let columns =
            Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
                .split(area);
        let left =
            Layout::vertical([Constraint::Length(6), Constraint::Min(1)]).split(columns[0]);

        // Panel order: devices, sensors, events
        self.panels[1].render(frame, left[0]);
        self.panels[0].render(frame, left[1]);
        self.panels[2].render(frame, columns[1]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let session = self
            .session
            .as_ref()
            .map(|s| format!("{} ({})", s.user, s.role))
            .unwrap_or_else(|| "—".into());

        let line = Line::from(vec![
            Span::styled(" domus ", theme::title_style()),
            Span::styled("│ ", theme::key_hint()),
            Span::styled(session, theme::row()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let connection = match self.connection_status {
            ConnectionStatus::Connected => {
                Span::styled("● conectado", Style::default().fg(theme::ON_GREEN))
            }
            ConnectionStatus::Connecting => {
                Span::styled("◐ conectando", Style::default().fg(theme::WARN_YELLOW))
            }
            ConnectionStatus::Disconnected => {
                Span::styled("○ desconectado", Style::default().fg(theme::ALERT_RED))
            }
        };

        let mut spans = vec![Span::raw(" "), connection];

        if let Some((notification, _)) = &self.notification {
            let style = match notification.level {
                NotificationLevel::Info => Style::default().fg(theme::WARN_YELLOW),
                NotificationLevel::Error => Style::default().fg(theme::ALERT_RED),
            };
            spans.push(Span::styled("  ", theme::key_hint()));
            spans.push(Span::styled(notification.message.clone(), style));
        } else {
            spans.push(Span::styled(
                "  │ Tab panel  1 seguridad  2 ahorro  q salir",
                theme::key_hint(),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_confirm_overlay(&self, frame: &mut Frame, area: Rect, device: &str) {
        let question = format!("¿Seguro que querés eliminar el dispositivo \"{device}\"?");
        let width = (question.chars().count() as u16 + 6).min(area.width.saturating_sub(4));
        let overlay = centered_rect(area, width, 5);

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            overlay,
        );
        let block = Block::default()
            .title(" Eliminar dispositivo ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let text = vec![
            Line::from(Span::styled(question, theme::row())),
            Line::from(""),
            Line::from(vec![
                Span::styled("y", theme::key_hint_key()),
                Span::styled(" eliminar   ", theme::key_hint()),
                Span::styled("n", theme::key_hint_key()),
                Span::styled(" cancelar", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(text), inner);
    }

    fn render_add_overlay(&self, frame: &mut Frame, area: Rect, buffer: &str) {
        let overlay = centered_rect(area, 44.min(area.width.saturating_sub(4)), 5);

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            overlay,
        );
        let block = Block::default()
            .title(" Nuevo dispositivo ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let text = vec![
            Line::from(vec![
                Span::styled("Nombre: ", theme::row()),
                Span::styled(buffer.to_string(), theme::title_style()),
                Span::styled("▏", theme::key_hint()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Enter", theme::key_hint_key()),
                Span::styled(" agregar   ", theme::key_hint()),
                Span::styled("Esc", theme::key_hint_key()),
                Span::styled(" cancelar", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(text), inner);
    }
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
