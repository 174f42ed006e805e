//! Theme and styling for the Gradecast TUI.
//!
//! Defines the color scheme and styling helpers used throughout the
//! interface: a dark theme with a green accent for focus and results.

use ratatui::style::{Color, Modifier, Style};

/// Accent color for highlights and focus indicators.
pub const ACCENT: Color = Color::Rgb(64, 192, 120);

/// Primary foreground color for normal text.
pub const FG: Color = Color::Rgb(224, 224, 230);

/// Muted foreground color for hints, labels, and secondary text.
pub const FG_MUTED: Color = Color::Rgb(168, 168, 175);

/// Default border color for unfocused UI elements.
pub const BORDER: Color = Color::Rgb(72, 72, 80);

/// Focused border color; uses the accent.
pub const BORDER_FOCUS: Color = ACCENT;

/// Background color for the highlighted form row.
pub const BG_HIGHLIGHT: Color = Color::Rgb(22, 36, 28);

/// Warning color for error messages.
pub const WARN: Color = Color::Rgb(220, 96, 110);

/// Border style based on focus state.
pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(BORDER_FOCUS)
    } else {
        Style::default().fg(BORDER)
    }
}

/// Style for titles and headers.
pub fn title_style() -> Style {
    Style::default().fg(FG_MUTED).add_modifier(Modifier::BOLD)
}

/// Style for normal text content.
pub fn text_style() -> Style {
    Style::default().fg(FG)
}

/// Style for secondary text.
pub fn text_muted() -> Style {
    Style::default().fg(FG_MUTED)
}

/// Style applied to the focused form row.
pub fn highlight_style() -> Style {
    Style::default().bg(BG_HIGHLIGHT)
}

/// Style for error output.
pub fn error_style() -> Style {
    Style::default().fg(WARN)
}
