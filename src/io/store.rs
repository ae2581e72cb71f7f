use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use indexmap::IndexMap;

use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::model::{Task, TaskList};

/// File name of the task store, relative to the working directory.
pub const TASKS_FILE: &str = "todo_tasks.json";

/// Error type for store writes. Loading never fails.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not serialize tasks: {0}")]
    SerializeError(#[from] serde_json::Error),
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Directory that holds a file, treating a bare file name as the current directory.
fn parent_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
}

/// Read the task mapping from `path`.
///
/// A missing, unreadable, or malformed file yields an empty list. Anything
/// other than a missing or empty file is copied to the recovery log first
/// so the next save cannot silently destroy it.
pub fn load_tasks(path: &Path) -> TaskList {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        // First run
        Err(e) if e.kind() == ErrorKind::NotFound => return TaskList::new(),
        Err(e) => {
            log_unreadable(path, e.to_string(), String::new());
            return TaskList::new();
        }
    };

    match serde_json::from_slice::<IndexMap<String, Task>>(&bytes) {
        Ok(tasks) => TaskList::from_map(tasks),
        Err(e) => {
            let content = String::from_utf8_lossy(&bytes);
            if !content.trim().is_empty() {
                log_unreadable(path, e.to_string(), content.into_owned());
            }
            TaskList::new()
        }
    }
}

fn log_unreadable(path: &Path, error: String, body: String) {
    recovery::log_recovery(
        parent_dir(path),
        RecoveryEntry {
            timestamp: Utc::now(),
            category: RecoveryCategory::Parser,
            description: "unreadable task file".to_string(),
            fields: vec![
                ("Source".to_string(), path.display().to_string()),
                ("Error".to_string(), error),
            ],
            body,
        },
    );
}

/// Serialize the whole mapping and overwrite `path` with it.
pub fn save_tasks(path: &Path, tasks: &TaskList) -> Result<(), StoreError> {
    let content = serde_json::to_string_pretty(tasks.as_map())?;
    if let Err(e) = recovery::atomic_write(path, content.as_bytes()) {
        recovery::log_recovery(
            parent_dir(path),
            RecoveryEntry {
                timestamp: Utc::now(),
                category: RecoveryCategory::Write,
                description: "task file write failed".to_string(),
                fields: vec![
                    ("Target".to_string(), path.display().to_string()),
                    ("Error".to_string(), e.to_string()),
                ],
                body: content,
            },
        );
        return Err(StoreError::WriteError {
            path: path.to_path_buf(),
            source: e,
        });
    }
    Ok(())
}

/// The task mapping together with the file it persists to.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    tasks: TaskList,
}

impl Store {
    /// Load the store from `dir`/todo_tasks.json. Identifiers the recovery
    /// log records as deleted are not handed out again.
    pub fn open(dir: &Path) -> Store {
        let path = dir.join(TASKS_FILE);
        let mut tasks = load_tasks(&path);
        if let Some(id) = recovery::highest_deleted_id(dir) {
            tasks.reserve_through(id);
        }
        Store { path, tasks }
    }

    /// A store over an already-built list. Nothing is written until `save`.
    pub fn new(path: PathBuf, tasks: TaskList) -> Store {
        Store { path, tasks }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the task file (and the recovery log)
    pub fn dir(&self) -> &Path {
        parent_dir(&self.path)
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut TaskList {
        &mut self.tasks
    }

    pub fn save(&self) -> Result<(), StoreError> {
        save_tasks(&self.path, &self.tasks)
    }
}
