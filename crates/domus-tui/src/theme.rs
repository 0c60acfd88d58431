//! Warm-amber palette and semantic styling for the dashboard.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const AMBER: Color = Color::Rgb(255, 179, 71); // #ffb347
pub const SOFT_ORANGE: Color = Color::Rgb(255, 140, 66); // #ff8c42
pub const ON_GREEN: Color = Color::Rgb(110, 220, 130); // #6edc82
pub const OFF_GRAY: Color = Color::Rgb(130, 135, 150); // #828796
pub const ALERT_RED: Color = Color::Rgb(255, 95, 95); // #ff5f5f
pub const WARN_YELLOW: Color = Color::Rgb(245, 222, 110); // #f5de6e

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(205, 205, 210); // #cdcdd2
pub const BORDER_GRAY: Color = Color::Rgb(90, 95, 110); // #5a5f6e
pub const BG_HIGHLIGHT: Color = Color::Rgb(45, 42, 38); // #2d2a26
pub const BG_DARK: Color = Color::Rgb(26, 25, 23); // #1a1917

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(AMBER).add_modifier(Modifier::BOLD)
}

/// Border for a focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(SOFT_ORANGE)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Normal row text.
pub fn row() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Selected / highlighted row.
pub fn row_selected() -> Style {
    Style::default()
        .fg(SOFT_ORANGE)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// A device that is on / a sensor in its calm state.
pub fn state_on() -> Style {
    Style::default().fg(ON_GREEN)
}

/// A device that is off.
pub fn state_off() -> Style {
    Style::default().fg(OFF_GRAY)
}

/// A sensor reading that needs attention (smoke, open door).
pub fn state_alert() -> Style {
    Style::default().fg(ALERT_RED).add_modifier(Modifier::BOLD)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(AMBER).add_modifier(Modifier::BOLD)
}
