use std::path::PathBuf;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::io::store::{Store, TASKS_FILE};
use crate::model::{TaskList, UiConfig};
use crate::ops::task_ops::add_task;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Build a task list from (description, date, time) triples, IDs 1..=n.
pub fn task_list(tasks: &[(&str, &str, &str)]) -> TaskList {
    let mut list = TaskList::new();
    for (description, date, time) in tasks {
        add_task(&mut list, description, date, time).unwrap();
    }
    list
}

/// An App whose store points into a directory that does not exist,
/// so every save fails.
pub fn app_with_tasks(tasks: &[(&str, &str, &str)]) -> App {
    let path = PathBuf::from("/nonexistent/todo-test").join(TASKS_FILE);
    App::new(Store::new(path, task_list(tasks)), UiConfig::default())
}

/// An App backed by a fresh temp directory. Keep the TempDir alive for the test.
pub fn app_in_tempdir(tasks: &[(&str, &str, &str)]) -> (TempDir, App) {
    let tmp = TempDir::new().unwrap();
    let store = Store::new(tmp.path().join(TASKS_FILE), task_list(tasks));
    (tmp, App::new(store, UiConfig::default()))
}

/// Render into an in-memory buffer and return it with styles intact.
pub fn render_to_buffer<F>(w: u16, h: u16, f: F) -> Buffer
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();
    terminal.backend().buffer().clone()
}
