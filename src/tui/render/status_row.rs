use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::unicode::{display_width, truncate_to_width};

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let message = app.status_message.as_deref().unwrap_or("");
    let hint = if app.ui.show_key_hints {
        match app.mode {
            Mode::Navigate => "a add  c done  d delete  s/S sort  ? help  q quit",
            Mode::Form => "Tab next  Enter add  Esc close",
            Mode::Confirm => "y delete  n cancel",
        }
    } else {
        ""
    };

    let mut spans = vec![Span::styled(
        truncate_to_width(message, width),
        Style::default().fg(app.theme.text).bg(bg),
    )];
    let content_width = display_width(message).min(width);
    let hint_width = display_width(hint);
    // The hint only shows when it fits beside the message
    if !hint.is_empty() && content_width + hint_width + 1 < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
