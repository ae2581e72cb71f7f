use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_segmentation::UnicodeSegmentation;

use crate::ops::task_ops::Field;
use crate::tui::app::{AddForm, App};
use crate::util::unicode::{byte_offset_to_display_col, display_width, truncate_to_width};

/// Label column width, including the trailing gap
const LABEL_W: usize = 20;

/// Rows the form needs: three inputs plus borders
pub const FORM_HEIGHT: u16 = 5;

fn label(field: Field) -> &'static str {
    match field {
        Field::Description => "Description",
        Field::Date => "Date (YYYY-MM-DD)",
        Field::Time => "Time (HH:MM)",
    }
}

/// Render the add-task form and place the terminal cursor in the focused input
pub fn render_add_form(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let text_style = Style::default().fg(app.theme.text).bg(bg);
    let label_style = Style::default().fg(app.theme.dim).bg(bg);
    let focus_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let value_style = Style::default().fg(app.theme.text_bright).bg(bg);

    let inner_w = area.width.saturating_sub(2) as usize;
    let value_w = inner_w.saturating_sub(LABEL_W + 1);
    let form = &app.form;

    let mut cursor_pos = None;
    let mut lines: Vec<Line> = Vec::new();
    for (row, field) in AddForm::FIELDS.iter().enumerate() {
        let focused = *field == form.focus;
        let marker = if focused { "\u{25B8}" } else { " " };
        let text = form.field(*field);
        let shown = if focused {
            let (window, col) = visible_window(text, form.cursor, value_w);
            cursor_pos = Some((
                area.x + 1 + (1 + LABEL_W + col) as u16,
                area.y + 1 + row as u16,
            ));
            window
        } else {
            truncate_to_width(text, value_w)
        };
        lines.push(Line::from(vec![
            Span::styled(marker, focus_style),
            Span::styled(
                format!("{:<width$}", label(*field), width = LABEL_W),
                if focused { focus_style } else { label_style },
            ),
            Span::styled(shown, value_style),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" Add Task ", focus_style))
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(text_style);
    frame.render_widget(Paragraph::new(lines).block(block), area);

    // Hide the cursor while a modal is on top of the form
    if app.notice.is_none()
        && !app.show_help
        && let Some(pos) = cursor_pos
    {
        frame.set_cursor_position(pos);
    }
}

/// The part of `text` that fits in `width` cells with the cursor visible,
/// and the cursor's column inside it.
fn visible_window(text: &str, cursor: usize, width: usize) -> (String, usize) {
    if width == 0 {
        return (String::new(), 0);
    }
    let col = byte_offset_to_display_col(text, cursor);
    // One cell is reserved for the cursor past the last character
    let skip = (col + 1).saturating_sub(width);

    let mut out = String::new();
    let mut pos = 0;
    for g in text.graphemes(true) {
        let gw = display_width(g);
        if pos >= skip && pos + gw <= skip + width {
            out.push_str(g);
        }
        pos += gw;
    }
    (out, col - skip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn shows_labels_and_values() {
        let mut app = app_with_tasks(&[]);
        app.form.description = "Buy milk".into();
        app.form.date = "2024-01-01".into();
        let output = render_to_string(TERM_W, FORM_HEIGHT, |frame, area| {
            render_add_form(frame, &app, area);
        });
        assert!(output.contains("Add Task"));
        assert!(output.contains("\u{25B8}Description"));
        assert!(output.contains("Buy milk"));
        assert!(output.contains("Date (YYYY-MM-DD)"));
        assert!(output.contains("2024-01-01"));
        assert!(output.contains("Time (HH:MM)"));
    }

    #[test]
    fn marker_follows_focus() {
        let mut app = app_with_tasks(&[]);
        app.form.focus = Field::Time;
        let output = render_to_string(TERM_W, FORM_HEIGHT, |frame, area| {
            render_add_form(frame, &app, area);
        });
        assert!(output.contains("\u{25B8}Time (HH:MM)"));
        assert!(!output.contains("\u{25B8}Description"));
    }

    #[test]
    fn window_scrolls_with_cursor() {
        assert_eq!(visible_window("hello", 5, 10), ("hello".to_string(), 5));
        assert_eq!(visible_window("hello world", 11, 6), ("world".to_string(), 5));
        assert_eq!(visible_window("hello world", 0, 6), ("hello ".to_string(), 0));
        assert_eq!(visible_window("abc", 1, 0), (String::new(), 0));
    }
}
