mod confirm;
mod form;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::store_ops::{self, ActionError};

use super::app::{App, Mode};

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    // A notice is modal: nothing else happens until it is dismissed
    if app.notice.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.notice = None;
        }
        return;
    }

    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return;
    }

    if app.recovery.is_some() {
        handle_recovery_log(app, key);
        return;
    }

    match app.mode {
        Mode::Navigate => navigate::handle_navigate(app, key),
        Mode::Form => form::handle_form(app, key),
        Mode::Confirm => confirm::handle_confirm(app, key),
    }
}

fn handle_recovery_log(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('L') => {
            app.recovery = None;
            app.recovery_scroll = 0;
        }
        // The overlay clamps the upper bound when it renders
        KeyCode::Down | KeyCode::Char('j') => app.recovery_scroll += 1,
        KeyCode::Up | KeyCode::Char('k') => {
            app.recovery_scroll = app.recovery_scroll.saturating_sub(1);
        }
        KeyCode::Home | KeyCode::Char('g') => app.recovery_scroll = 0,
        _ => {}
    }
}

/// Show an action failure as an error notice
fn report(app: &mut App, err: &ActionError) {
    app.error(err.title(), err.to_string());
}

/// Delete a task and clamp the cursor, reporting the outcome
fn delete_task(app: &mut App, task_id: Option<&str>) {
    let result = store_ops::delete(&mut app.store, task_id);
    app.clamp_cursor();
    match result {
        Ok((id, task)) => app.info(
            "Deleted",
            format!("Task {} \u{201c}{}\u{201d} deleted.", id, task.description),
        ),
        Err(e) => report(app, &e),
    }
}


#[cfg(test)]
mod tests {
    use super::test_keys::*;
    use super::*;
    use crate::tui::app::NoticeKind;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn notice_blocks_other_input() {
        let (_tmp, mut app) = app_in_tempdir(&[("a", "2099-01-01", "09:00")]);
        app.error("Oops", "something");
        press_char(&mut app, 'a');
        press_char(&mut app, 'q');
        assert_eq!(app.mode, Mode::Navigate);
        assert!(!app.should_quit);
        assert!(app.notice.is_some());

        press(&mut app, KeyCode::Enter);
        assert!(app.notice.is_none());
    }

    #[test]
    fn ctrl_c_quits_from_anywhere() {
        let (_tmp, mut app) = app_in_tempdir(&[]);
        press_char(&mut app, 'a');
        assert_eq!(app.mode, Mode::Form);
        press_ctrl(&mut app, 'c');
        assert!(app.should_quit);
    }

    #[test]
    fn help_toggles() {
        let (_tmp, mut app) = app_in_tempdir(&[]);
        press_char(&mut app, '?');
        assert!(app.show_help);
        // Keys other than close are swallowed
        press_char(&mut app, 'a');
        assert_eq!(app.mode, Mode::Navigate);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
    }

    #[test]
    fn recovery_log_opens_and_scrolls() {
        let (_tmp, mut app) = app_in_tempdir(&[
            ("a", "2025-01-01", "09:00"),
            ("b", "2025-01-02", "09:00"),
        ]);
        app.ui.confirm_delete = false;
        press_char(&mut app, 'd');
        press(&mut app, KeyCode::Enter);

        press_char(&mut app, 'L');
        assert_eq!(app.recovery.as_ref().map(Vec::len), Some(1));
        press_char(&mut app, 'j');
        press_char(&mut app, 'j');
        press_char(&mut app, 'k');
        assert_eq!(app.recovery_scroll, 1);
        // Navigation keys do not reach the table underneath
        press_char(&mut app, 'd');
        assert_eq!(app.store.tasks().len(), 1);

        press(&mut app, KeyCode::Esc);
        assert!(app.recovery.is_none());
        assert_eq!(app.recovery_scroll, 0);
    }

    #[test]
    fn add_complete_delete_scenario() {
        let (tmp, mut app) = app_in_tempdir(&[]);
        app.ui.confirm_delete = false;

        press_char(&mut app, 'a');
        type_str(&mut app, "Call bank");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "2099-01-01");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "09:00");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.notice.as_ref().unwrap().kind, NoticeKind::Info);
        press(&mut app, KeyCode::Enter);

        press_char(&mut app, 'c');
        assert_eq!(app.notice.as_ref().unwrap().title, "Completed");
        press(&mut app, KeyCode::Esc);

        press_char(&mut app, 'd');
        assert_eq!(app.notice.as_ref().unwrap().title, "Deleted");
        assert!(app.store.tasks().is_empty());

        let on_disk = crate::io::store::Store::open(tmp.path());
        assert!(on_disk.tasks().is_empty());
    }
}
