use chrono::NaiveDateTime;
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::model::Urgency;
use crate::ops::display::build_rows;
use crate::tui::app::App;
use crate::util::unicode::{display_width, truncate_to_width};

const ID_W: u16 = 6;
const DATE_W: u16 = 10;
const TIME_W: u16 = 5;
const STATUS_W: u16 = 9;
const SPACING: u16 = 1;

/// Render the task table, one colored row per task
pub fn render_task_table(frame: &mut Frame, app: &mut App, area: Rect, now: NaiveDateTime) {
    let bg = app.theme.background;
    let highlight = app.theme.highlight;
    let dim = app.theme.dim;

    let (len, overdue) = {
        let rows = build_rows(app.store.tasks(), now);
        let overdue = rows
            .iter()
            .filter(|r| r.urgency == Urgency::Overdue)
            .count();
        (rows.len(), overdue)
    };
    let title = format!(
        " To-Do List: {} task{}, {} overdue ",
        len,
        if len == 1 { "" } else { "s" },
        overdue
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            title,
            Style::default()
                .fg(highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(dim).bg(bg))
        .style(Style::default().bg(bg));

    if len == 0 {
        let hint = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                " No tasks yet. Press a to add one.",
                Style::default().fg(dim).bg(bg),
            )),
        ])
        .block(block);
        frame.render_widget(hint, area);
        return;
    }

    // Header takes one of the inner rows
    let visible = area.height.saturating_sub(3) as usize;
    adjust_scroll(app, len, visible);

    let inner_w = area.width.saturating_sub(2);
    let desc_w = inner_w
        .saturating_sub(ID_W + DATE_W + TIME_W + STATUS_W + 4 * SPACING)
        .max(1) as usize;

    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let header = Row::new(["  ID", "Description", "Date", "Time", "Status"]).style(header_style);

    let rows: Vec<Row> = build_rows(app.store.tasks(), now)
        .into_iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(visible)
        .map(|(idx, row)| {
            let selected = idx == app.cursor;
            let mut style = Style::default()
                .fg(app.theme.row_text)
                .bg(app.theme.urgency_color(row.urgency));
            if selected {
                style = style.add_modifier(Modifier::BOLD);
            }
            let marker = if selected { "\u{25B6} " } else { "  " };
            Row::new(vec![
                Cell::from(format!("{}{}", marker, row.id)),
                Cell::from(truncate_to_width(&row.task.description, desc_w)),
                Cell::from(row.task.date_str()),
                Cell::from(row.task.time_str()),
                Cell::from(row.task.status.label()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(ID_W),
        Constraint::Fill(1),
        Constraint::Length(DATE_W),
        Constraint::Length(TIME_W),
        Constraint::Length(STATUS_W),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(SPACING)
        .block(block);
    frame.render_widget(table, area);

    if len > visible && visible > 0 {
        render_scroll_hint(frame, app, area, len, visible);
    }
}

/// Keep the cursor inside the visible window
fn adjust_scroll(app: &mut App, len: usize, visible: usize) {
    if visible == 0 {
        return;
    }
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if app.cursor >= app.scroll_offset + visible {
        app.scroll_offset = app.cursor + 1 - visible;
    }
    app.scroll_offset = app.scroll_offset.min(len.saturating_sub(visible));
}

/// "n-m of k" on the bottom border when the list does not fit
fn render_scroll_hint(frame: &mut Frame, app: &App, area: Rect, len: usize, visible: usize) {
    let first = app.scroll_offset + 1;
    let last = (app.scroll_offset + visible).min(len);
    let text = format!(" {}-{} of {} ", first, last, len);
    let w = display_width(&text) as u16;
    if w + 2 > area.width {
        return;
    }
    let hint_area = Rect::new(
        area.x + area.width - w - 1,
        area.y + area.height - 1,
        w,
        1,
    );
    let hint = Paragraph::new(Span::styled(
        text,
        Style::default().fg(app.theme.dim).bg(app.theme.background),
    ));
    frame.render_widget(hint, hint_area);
}
