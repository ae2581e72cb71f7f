use chrono::NaiveDateTime;

use crate::model::task::{Task, Urgency};
use crate::model::task_list::TaskList;

/// One table row: a task plus the urgency it has at render time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow<'a> {
    pub id: &'a str,
    pub task: &'a Task,
    pub urgency: Urgency,
}

/// Rows in display order, classified against `now`.
pub fn build_rows(list: &TaskList, now: NaiveDateTime) -> Vec<TaskRow<'_>> {
    list.iter()
        .map(|(id, task)| TaskRow {
            id,
            task,
            urgency: task.urgency(now),
        })
        .collect()
}
