use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, ConfirmAction};

use super::helpers::{centered_rect_fixed, wrap_text};

/// Render the y/n prompt for a pending destructive action
pub fn render_confirm_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ConfirmAction::DeleteTask { task_id }) = &app.confirm else {
        return;
    };
    let Some(task) = app.store.tasks().get(task_id) else {
        return;
    };

    let popup_w: u16 = 48.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(2) as usize;

    let bg = app.theme.background;
    let error = app.theme.error;
    let header_style = Style::default()
        .fg(error)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(app.theme.text).bg(bg);
    let bright_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        format!(" Delete task {}?", task_id),
        header_style,
    )));
    lines.push(Line::from(Span::styled("", text_style)));

    let quoted = format!("\u{201c}{}\u{201d}", task.description);
    for s in wrap_text("   ", &quoted, inner_w) {
        lines.push(Line::from(Span::styled(s, bright_style)));
    }
    lines.push(Line::from(Span::styled(
        format!("   due {} {}", task.date_str(), task.time_str()),
        text_style,
    )));
    lines.push(Line::from(Span::styled("", text_style)));
    lines.push(Line::from(vec![
        Span::styled(" y", key_style),
        Span::styled(" delete   ", text_style),
        Span::styled("n", key_style),
        Span::styled(" cancel", text_style),
    ]));

    let popup_h = ((lines.len() as u16) + 2).min(area.height.saturating_sub(2));
    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(error).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), overlay_area);
}
