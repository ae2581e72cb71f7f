use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::config_io::load_config;
use crate::io::recovery::{RECOVERY_LOG, RecoveryEntry, recovery_entry_count};
use crate::io::store::Store;
use crate::model::UiConfig;
use crate::ops::task_ops::Field;

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Moving through the task table
    Navigate,
    /// Typing into the add-task form
    Form,
    /// Waiting for y/n on a destructive action
    Confirm,
}

/// The add-task form: three text inputs, one focused at a time
#[derive(Debug, Clone)]
pub struct AddForm {
    pub description: String,
    pub date: String,
    pub time: String,
    pub focus: Field,
    /// Byte offset of the cursor in the focused field
    pub cursor: usize,
}

impl Default for AddForm {
    fn default() -> Self {
        AddForm {
            description: String::new(),
            date: String::new(),
            time: String::new(),
            focus: Field::Description,
            cursor: 0,
        }
    }
}

impl AddForm {
    pub const FIELDS: [Field; 3] = [Field::Description, Field::Date, Field::Time];

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Description => &self.description,
            Field::Date => &self.date,
            Field::Time => &self.time,
        }
    }

    pub fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Description => &mut self.description,
            Field::Date => &mut self.date,
            Field::Time => &mut self.time,
        }
    }

    /// Text of the focused field
    pub fn current(&self) -> &str {
        self.field(self.focus)
    }

    /// Move focus by `delta` fields (wrapping), cursor to end of the new field
    pub fn cycle_focus(&mut self, delta: isize) {
        let idx = Self::FIELDS
            .iter()
            .position(|f| *f == self.focus)
            .unwrap_or(0) as isize;
        let len = Self::FIELDS.len() as isize;
        self.focus = Self::FIELDS[(idx + delta).rem_euclid(len) as usize];
        self.cursor = self.current().len();
    }

    /// Empty all inputs and focus the description
    pub fn clear(&mut self) {
        *self = AddForm::default();
    }
}

/// Severity of a modal notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A modal message. While one is showing, every other key is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

/// What a pending y/n prompt will do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteTask { task_id: String },
}

/// Main application state
pub struct App {
    pub store: Store,
    pub ui: UiConfig,
    pub theme: Theme,
    pub mode: Mode,
    pub should_quit: bool,
    /// Row index of the selection in the task table
    pub cursor: usize,
    /// First visible row of the task table
    pub scroll_offset: usize,
    pub form: AddForm,
    pub notice: Option<Notice>,
    pub confirm: Option<ConfirmAction>,
    pub show_help: bool,
    /// Recovery log entries while the log overlay is open, most recent first
    pub recovery: Option<Vec<RecoveryEntry>>,
    /// First visible line of the recovery log overlay
    pub recovery_scroll: usize,
    /// Transient one-line message in the status row
    pub status_message: Option<String>,
}

impl App {
    pub fn new(store: Store, ui: UiConfig) -> Self {
        let theme = Theme::from_config(&ui);
        App {
            store,
            ui,
            theme,
            mode: Mode::Navigate,
            should_quit: false,
            cursor: 0,
            scroll_offset: 0,
            form: AddForm::default(),
            notice: None,
            confirm: None,
            show_help: false,
            recovery: None,
            recovery_scroll: 0,
            status_message: None,
        }
    }

    /// ID of the task under the cursor, or None when the list is empty
    pub fn selected_id(&self) -> Option<&str> {
        self.store
            .tasks()
            .get_index(self.cursor)
            .map(|(id, _)| id)
    }

    /// Put the cursor on a task by ID (no-op if it is gone)
    pub fn select_id(&mut self, task_id: &str) {
        if let Some(pos) = self.store.tasks().position(task_id) {
            self.cursor = pos;
        }
    }

    /// Keep the cursor inside the list after it shrinks
    pub fn clamp_cursor(&mut self) {
        let len = self.store.tasks().len();
        self.cursor = if len == 0 { 0 } else { self.cursor.min(len - 1) };
    }

    pub fn info(&mut self, title: &str, message: impl Into<String>) {
        self.notice = Some(Notice {
            kind: NoticeKind::Info,
            title: title.to_string(),
            message: message.into(),
        });
    }

    pub fn error(&mut self, title: &str, message: impl Into<String>) {
        self.notice = Some(Notice {
            kind: NoticeKind::Error,
            title: title.to_string(),
            message: message.into(),
        });
    }
}

/// Run the TUI application against the task file in the working directory
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let config = load_config(&cwd)?;
    let store = Store::open(&cwd);

    let mut app = App::new(store, config.ui);
    let recovered = recovery_entry_count(app.store.dir());
    if recovered > 0 {
        app.status_message = Some(format!(
            "{} entr{} in {} (L to view)",
            recovered,
            if recovered == 1 { "y" } else { "ies" },
            RECOVERY_LOG
        ));
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        // Poll so overdue colors refresh as the clock passes due times
        if event::poll(Duration::from_millis(1000))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
