use ratatui::style::Color;

use crate::model::{UiConfig, Urgency};

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    /// Row background for completed tasks
    pub completed: Color,
    /// Row background for overdue tasks
    pub overdue: Color,
    /// Row background for upcoming tasks
    pub upcoming: Color,
    /// Foreground on colored rows
    pub row_text: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x1E, 0x1E, 0x24),
            text: Color::Rgb(0xD0, 0xD0, 0xD8),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0x44, 0xDD, 0xFF),
            dim: Color::Rgb(0x80, 0x80, 0x90),
            completed: Color::Rgb(0x90, 0xEE, 0x90),
            overdue: Color::Rgb(0xFF, 0x63, 0x47),
            upcoming: Color::Rgb(0xFF, 0xD7, 0x00),
            row_text: Color::Rgb(0x10, 0x10, 0x10),
            error: Color::Rgb(0xFF, 0x44, 0x44),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from the UI config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            if let Some(color) = parse_hex_color(value) {
                match key.as_str() {
                    "background" => theme.background = color,
                    "text" => theme.text = color,
                    "text_bright" => theme.text_bright = color,
                    "highlight" => theme.highlight = color,
                    "dim" => theme.dim = color,
                    "completed" => theme.completed = color,
                    "overdue" => theme.overdue = color,
                    "upcoming" => theme.upcoming = color,
                    "row_text" => theme.row_text = color,
                    "error" => theme.error = color,
                    _ => {}
                }
            }
        }

        theme
    }

    /// Row background for an urgency class
    pub fn urgency_color(&self, urgency: Urgency) -> Color {
        match urgency {
            Urgency::Completed => self.completed,
            Urgency::Overdue => self.overdue,
            Urgency::Upcoming => self.upcoming,
        }
    }
}
