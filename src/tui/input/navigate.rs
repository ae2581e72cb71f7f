use crossterm::event::{KeyCode, KeyEvent};

use crate::io::recovery::read_recovery_entries;
use crate::ops::store_ops::{self, ActionError};
use crate::ops::task_ops::SortKey;
use crate::tui::app::{App, ConfirmAction, Mode};

use super::{delete_task, report};

/// Most recent recovery entries shown by the log overlay
const RECOVERY_VIEW_LIMIT: usize = 20;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    app.status_message = None;

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('L') => open_recovery_log(app),

        KeyCode::Down | KeyCode::Char('j') => move_cursor(app, 1),
        KeyCode::Up | KeyCode::Char('k') => move_cursor(app, -1),
        KeyCode::Home | KeyCode::Char('g') => app.cursor = 0,
        KeyCode::End | KeyCode::Char('G') => {
            app.cursor = app.store.tasks().len().saturating_sub(1);
        }

        KeyCode::Char('a') => open_form(app),
        KeyCode::Char('c') | KeyCode::Char('x') | KeyCode::Char(' ') => complete_selected(app),
        KeyCode::Char('d') | KeyCode::Delete => request_delete(app),
        KeyCode::Char('s') => sort(app, SortKey::Date),
        KeyCode::Char('S') => sort(app, SortKey::Alphabetical),
        _ => {}
    }
}

fn move_cursor(app: &mut App, delta: isize) {
    let len = app.store.tasks().len();
    if len == 0 {
        app.cursor = 0;
        return;
    }
    app.cursor = app.cursor.saturating_add_signed(delta).min(len - 1);
}

/// Open the add form, keeping whatever was typed last time
fn open_form(app: &mut App) {
    app.mode = Mode::Form;
    app.form.cursor = app.form.current().len();
}

fn complete_selected(app: &mut App) {
    let selection = app.selected_id().map(str::to_string);
    match store_ops::complete(&mut app.store, selection.as_deref()) {
        Ok(id) => app.info("Completed", format!("Task {} marked as completed.", id)),
        Err(e) => report(app, &e),
    }
}

fn request_delete(app: &mut App) {
    let Some(task_id) = app.selected_id().map(str::to_string) else {
        report(app, &ActionError::NoSelection);
        return;
    };
    if app.ui.confirm_delete {
        app.confirm = Some(ConfirmAction::DeleteTask { task_id });
        app.mode = Mode::Confirm;
    } else {
        delete_task(app, Some(&task_id));
    }
}

fn open_recovery_log(app: &mut App) {
    app.recovery = Some(read_recovery_entries(
        app.store.dir(),
        Some(RECOVERY_VIEW_LIMIT),
    ));
    app.recovery_scroll = 0;
}

/// Sort and persist, keeping the cursor on the same task
fn sort(app: &mut App, key: SortKey) {
    let keep = app.selected_id().map(str::to_string);
    let result = store_ops::sort(&mut app.store, key);
    if let Some(id) = keep {
        app.select_id(&id);
    }
    match result {
        Ok(()) => app.status_message = Some(format!("sorted by {}", key.label())),
        Err(e) => report(app, &e),
    }
}
