pub mod add_form;
pub mod confirm_popup;
mod helpers;
pub mod help_overlay;
pub mod notice_popup;
pub mod recovery_overlay;
pub mod status_row;
pub mod task_table;

#[cfg(test)]
pub mod test_helpers;

use chrono::{Local, NaiveDateTime};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::{App, Mode};

/// Main render function, classifying rows against the local clock
pub fn render(frame: &mut Frame, app: &mut App) {
    render_at(frame, app, Local::now().naive_local());
}

/// Render the whole screen as of `now`
pub fn render_at(frame: &mut Frame, app: &mut App, now: NaiveDateTime) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: table | add form (only while adding) | status row (1 row)
    let form_h = if app.mode == Mode::Form {
        add_form::FORM_HEIGHT
    } else {
        0
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(form_h),
            Constraint::Length(1),
        ])
        .split(area);

    task_table::render_task_table(frame, app, chunks[0], now);
    if app.mode == Mode::Form {
        add_form::render_add_form(frame, app, chunks[1]);
    }
    status_row::render_status_row(frame, app, chunks[2]);

    // Overlays, topmost last
    if app.mode == Mode::Confirm {
        confirm_popup::render_confirm_popup(frame, app, area);
    }
    if app.recovery.is_some() {
        recovery_overlay::render_recovery_overlay(frame, app, area);
    }
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }
    if app.notice.is_some() {
        notice_popup::render_notice_popup(frame, app, area);
    }
}
