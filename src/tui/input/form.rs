use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::store_ops::{self, ActionError};
use crate::ops::task_ops::{Field, TaskError, ValidationError};
use crate::tui::app::{App, Mode};
use crate::util::unicode::{next_grapheme_boundary, prev_grapheme_boundary, word_boundary_left};

use super::report;

pub(super) fn handle_form(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        // Close the form but keep what was typed
        KeyCode::Esc => app.mode = Mode::Navigate,
        KeyCode::Enter => submit(app),
        KeyCode::Tab | KeyCode::Down => app.form.cycle_focus(1),
        KeyCode::BackTab | KeyCode::Up => app.form.cycle_focus(-1),

        KeyCode::Left => {
            if let Some(pos) = prev_grapheme_boundary(app.form.current(), app.form.cursor) {
                app.form.cursor = pos;
            }
        }
        KeyCode::Right => {
            if let Some(pos) = next_grapheme_boundary(app.form.current(), app.form.cursor) {
                app.form.cursor = pos;
            }
        }
        KeyCode::Home => app.form.cursor = 0,
        KeyCode::End => app.form.cursor = app.form.current().len(),

        KeyCode::Backspace => {
            let cursor = app.form.cursor;
            if let Some(start) = prev_grapheme_boundary(app.form.current(), cursor) {
                let focus = app.form.focus;
                app.form.field_mut(focus).replace_range(start..cursor, "");
                app.form.cursor = start;
            }
        }
        KeyCode::Delete => {
            let cursor = app.form.cursor;
            if let Some(end) = next_grapheme_boundary(app.form.current(), cursor) {
                let focus = app.form.focus;
                app.form.field_mut(focus).replace_range(cursor..end, "");
            }
        }

        KeyCode::Char('u') if ctrl => {
            let focus = app.form.focus;
            app.form.field_mut(focus).clear();
            app.form.cursor = 0;
        }
        KeyCode::Char('w') if ctrl => {
            let cursor = app.form.cursor;
            let start = word_boundary_left(app.form.current(), cursor);
            let focus = app.form.focus;
            app.form.field_mut(focus).replace_range(start..cursor, "");
            app.form.cursor = start;
        }
        KeyCode::Char(c) if !ctrl && !alt => {
            let cursor = app.form.cursor;
            let focus = app.form.focus;
            app.form.field_mut(focus).insert(cursor, c);
            app.form.cursor += c.len_utf8();
        }
        _ => {}
    }
}

fn submit(app: &mut App) {
    let result = store_ops::add(
        &mut app.store,
        &app.form.description,
        &app.form.date,
        &app.form.time,
    );
    match result {
        Ok(id) => {
            app.form.clear();
            app.mode = Mode::Navigate;
            app.select_id(&id);
            app.info("Added", format!("Task {} added.", id));
        }
        Err(e) => {
            if let ActionError::Task(TaskError::Validation(v)) = &e {
                app.form.focus = offending_field(v);
                app.form.cursor = app.form.current().len();
            } else {
                // The task is in memory even though the write failed
                app.form.clear();
                app.mode = Mode::Navigate;
                app.cursor = app.store.tasks().len().saturating_sub(1);
            }
            report(app, &e);
        }
    }
}

fn offending_field(err: &ValidationError) -> Field {
    match err {
        ValidationError::MissingField(field) => *field,
        ValidationError::InvalidDate(_) => Field::Date,
        ValidationError::InvalidTime(_) => Field::Time,
    }
}
