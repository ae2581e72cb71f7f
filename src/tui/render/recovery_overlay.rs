use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::io::recovery::RECOVERY_LOG;
use crate::tui::app::App;
use crate::util::unicode::truncate_to_width;

/// Render the recovery log overlay (most of the screen)
pub fn render_recovery_overlay(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(entries) = &app.recovery else {
        return;
    };

    let bg = app.theme.background;
    let dim = app.theme.dim;
    let header_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(app.theme.text).bg(bg);
    let body_style = Style::default().fg(dim).bg(bg);

    let margin_x = 4u16.min(area.width / 8);
    let margin_y = 2u16.min(area.height / 8);
    let popup_area = Rect::new(
        area.x + margin_x,
        area.y + margin_y,
        area.width.saturating_sub(margin_x * 2),
        area.height.saturating_sub(margin_y * 2),
    );
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", RECOVERY_LOG),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(dim).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    if entries.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled("No recovery log entries.", body_style)));
        frame.render_widget(empty, inner);
        return;
    }

    let width = inner.width as usize;
    let mut styled_lines: Vec<(String, Style)> = Vec::new();
    for entry in entries {
        styled_lines.push((
            format!(
                "{}  {}: {}",
                entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                entry.category,
                entry.description
            ),
            header_style,
        ));
        for (key, value) in &entry.fields {
            styled_lines.push((format!("  {}: {}", key, value), text_style));
        }
        for body_line in entry.body.lines() {
            styled_lines.push((format!("  {}", body_line), body_style));
        }
        styled_lines.push((String::new(), text_style));
    }

    let visible = inner.height as usize;
    let scroll = app
        .recovery_scroll
        .min(styled_lines.len().saturating_sub(visible));
    app.recovery_scroll = scroll;

    let lines: Vec<Line> = styled_lines
        .into_iter()
        .skip(scroll)
        .take(visible)
        .map(|(text, style)| Line::from(Span::styled(truncate_to_width(&text, width), style)))
        .collect();
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::recovery::{RecoveryCategory, RecoveryEntry};
    use crate::tui::render::test_helpers::*;
    use chrono::{TimeZone, Utc};

    fn entry(description: &str, body: &str) -> RecoveryEntry {
        RecoveryEntry {
            timestamp: Utc.with_ymd_and_hms(2025, 5, 1, 12, 30, 0).unwrap(),
            category: RecoveryCategory::Delete,
            description: description.to_string(),
            fields: vec![("Task".to_string(), "3".to_string())],
            body: body.to_string(),
        }
    }

    #[test]
    fn lists_entries_with_bodies() {
        let mut app = app_with_tasks(&[]);
        app.recovery = Some(vec![entry("task 3 deleted", "{\n  \"description\": \"gone\"\n}")]);
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_recovery_overlay(frame, &mut app, area);
        });
        assert!(output.contains(".todo_recovery.log"));
        assert!(output.contains("2025-05-01 12:30:00  delete: task 3 deleted"));
        assert!(output.contains("Task: 3"));
        assert!(output.contains("\"description\": \"gone\""));
    }

    #[test]
    fn empty_log() {
        let mut app = app_with_tasks(&[]);
        app.recovery = Some(Vec::new());
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_recovery_overlay(frame, &mut app, area);
        });
        assert!(output.contains("No recovery log entries."));
    }

    #[test]
    fn scroll_is_clamped() {
        let mut app = app_with_tasks(&[]);
        app.recovery = Some(vec![entry("one", "x")]);
        app.recovery_scroll = 50;
        render_to_string(TERM_W, TERM_H, |frame, area| {
            render_recovery_overlay(frame, &mut app, area);
        });
        // Four lines fit in the overlay, so no scrolling is needed
        assert_eq!(app.recovery_scroll, 0);
    }
}
