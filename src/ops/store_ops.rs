//! User-action handlers. Each one takes the store explicitly, applies the
//! pure operation from `task_ops`, and writes the whole mapping back.
//!
//! When the write fails the in-memory change is kept and the error is
//! returned, so the caller can tell the user their change is not on disk.

use crate::io::recovery;
use crate::io::store::{Store, StoreError};
use crate::model::Task;
use crate::ops::task_ops::{self, SortKey, TaskError};

/// Error type for user actions
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("select a task first")]
    NoSelection,
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error("{0} (changes are not saved)")]
    Store(#[from] StoreError),
}

impl ActionError {
    /// Short title for the notice shown to the user
    pub fn title(&self) -> &'static str {
        match self {
            ActionError::NoSelection => "No selection",
            ActionError::Task(TaskError::Validation(_)) => "Invalid task",
            ActionError::Task(TaskError::NotFound(_)) => "Not found",
            ActionError::Store(_) => "Save failed",
        }
    }
}

fn selected(selection: Option<&str>) -> Result<&str, ActionError> {
    selection.ok_or(ActionError::NoSelection)
}

/// Add a task from raw form input. Returns the new task's ID.
pub fn add(store: &mut Store, description: &str, date: &str, time: &str) -> Result<String, ActionError> {
    let id = task_ops::add_task(store.tasks_mut(), description, date, time)?;
    store.save()?;
    Ok(id)
}

/// Mark the selected task completed. Saves even when it already was.
pub fn complete(store: &mut Store, selection: Option<&str>) -> Result<String, ActionError> {
    let id = selected(selection)?;
    task_ops::complete_task(store.tasks_mut(), id)?;
    store.save()?;
    Ok(id.to_string())
}

/// Delete the selected task. The removed record is written to the
/// recovery log before the store is saved.
pub fn delete(store: &mut Store, selection: Option<&str>) -> Result<(String, Task), ActionError> {
    let id = selected(selection)?;
    let task = task_ops::delete_task(store.tasks_mut(), id)?;
    let source = serde_json::to_string_pretty(&task).unwrap_or_else(|_| task.description.clone());
    recovery::log_task_deletion(store.dir(), id, &source);
    store.save()?;
    Ok((id.to_string(), task))
}

/// Reorder the list and persist the new order.
pub fn sort(store: &mut Store, key: SortKey) -> Result<(), ActionError> {
    task_ops::sort_tasks(store.tasks_mut(), key);
    store.save()?;
    Ok(())
}
