use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

use super::helpers::centered_rect;

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let overlay_area = centered_rect(70, 90, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(" Task list", header_style)));
    add_binding(&mut lines, " \u{2191}\u{2193}/jk", "Move selection", key_style, desc_style);
    add_binding(&mut lines, " g/G", "Jump to first/last", key_style, desc_style);
    add_binding(&mut lines, " a", "Add task", key_style, desc_style);
    add_binding(&mut lines, " c/x/Space", "Mark completed", key_style, desc_style);
    add_binding(&mut lines, " d/Del", "Delete task", key_style, desc_style);
    add_binding(&mut lines, " s", "Sort by due date", key_style, desc_style);
    add_binding(&mut lines, " S", "Sort by description", key_style, desc_style);
    add_binding(&mut lines, " L", "Recovery log", key_style, desc_style);
    add_binding(&mut lines, " ?", "This help", key_style, desc_style);
    add_binding(&mut lines, " q", "Quit", key_style, desc_style);
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(" Add form", header_style)));
    add_binding(&mut lines, " Tab/\u{2193}", "Next field", key_style, desc_style);
    add_binding(&mut lines, " S-Tab/\u{2191}", "Previous field", key_style, desc_style);
    add_binding(&mut lines, " Enter", "Add the task", key_style, desc_style);
    add_binding(&mut lines, " Ctrl-U/W", "Clear field/word", key_style, desc_style);
    add_binding(&mut lines, " Esc", "Close, keep input", key_style, desc_style);
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(" Row colors", header_style)));
    add_swatch(&mut lines, app.theme.completed, "Completed", desc_style);
    add_swatch(&mut lines, app.theme.overdue, "Overdue (pending, past due)", desc_style);
    add_swatch(&mut lines, app.theme.upcoming, "Upcoming (pending)", desc_style);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" Help ", header_style))
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));

    frame.render_widget(Paragraph::new(lines).block(block), overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 16;
    let padded_key = format!("{:<width$}", key, width = key_width);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}

fn add_swatch<'a>(lines: &mut Vec<Line<'a>>, color: Color, desc: &'a str, desc_style: Style) {
    lines.push(Line::from(vec![
        Span::styled(" ", desc_style),
        Span::styled("    ", Style::default().bg(color)),
        Span::styled(" ".repeat(11), desc_style),
        Span::styled(desc, desc_style),
    ]));
}
