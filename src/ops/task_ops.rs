use std::fmt;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

use crate::model::task::{Task, TaskStatus};
use crate::model::task_list::TaskList;

/// `YYYY-MM-DD`, ASCII digits only
static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid date pattern"));

/// `H:MM` or `HH:MM`
static TIME_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{1,2}:[0-9]{2}$").expect("valid time pattern"));

/// One of the three add-task inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Description,
    Date,
    Time,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Description => write!(f, "description"),
            Field::Date => write!(f, "date"),
            Field::Time => write!(f, "time"),
        }
    }
}

/// Rejected add-task input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("all fields must be filled in ({0} is empty)")]
    MissingField(Field),
    #[error("invalid date \"{0}\": expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("invalid time \"{0}\": expected HH:MM (24-hour)")]
    InvalidTime(String),
}

/// Error type for task operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("task not found: {0}")]
    NotFound(String),
}

/// Sort order for the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Due date, then due time, earliest first
    Date,
    /// Description, case-insensitive
    Alphabetical,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Date => "date",
            SortKey::Alphabetical => "description",
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let input = input.trim();
    if !DATE_SHAPE.is_match(input) {
        return Err(ValidationError::InvalidDate(input.to_string()));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(input.to_string()))
}

pub fn parse_time(input: &str) -> Result<NaiveTime, ValidationError> {
    let input = input.trim();
    if !TIME_SHAPE.is_match(input) {
        return Err(ValidationError::InvalidTime(input.to_string()));
    }
    NaiveTime::parse_from_str(input, "%H:%M")
        .map_err(|_| ValidationError::InvalidTime(input.to_string()))
}

/// Check the raw form inputs and build a pending task from them.
/// Empty fields are reported before malformed ones.
pub fn validate_new_task(
    description: &str,
    date: &str,
    time: &str,
) -> Result<Task, ValidationError> {
    let description = description.trim();
    for (field, value) in [
        (Field::Description, description),
        (Field::Date, date.trim()),
        (Field::Time, time.trim()),
    ] {
        if value.is_empty() {
            return Err(ValidationError::MissingField(field));
        }
    }
    let date = parse_date(date)?;
    let time = parse_time(time)?;
    Ok(Task::new(description.to_string(), date, time))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Validate and append a new pending task. Returns the assigned ID.
/// On error the list is untouched.
pub fn add_task(
    list: &mut TaskList,
    description: &str,
    date: &str,
    time: &str,
) -> Result<String, TaskError> {
    let task = validate_new_task(description, date, time)?;
    Ok(list.push(task))
}

/// Mark a task completed. Completing a completed task is a no-op.
pub fn complete_task(list: &mut TaskList, task_id: &str) -> Result<(), TaskError> {
    let task = list
        .get_mut(task_id)
        .ok_or_else(|| TaskError::NotFound(task_id.to_string()))?;
    task.status = TaskStatus::Completed;
    Ok(())
}

/// Remove a task and return it.
pub fn delete_task(list: &mut TaskList, task_id: &str) -> Result<Task, TaskError> {
    list.remove(task_id)
        .ok_or_else(|| TaskError::NotFound(task_id.to_string()))
}

/// Reorder the list. Ties keep their current relative order.
pub fn sort_tasks(list: &mut TaskList, key: SortKey) {
    match key {
        SortKey::Date => list.sort_by(|a, b| (a.date, a.time).cmp(&(b.date, b.time))),
        SortKey::Alphabetical => {
            list.sort_by(|a, b| fold_case(&a.description).cmp(&fold_case(&b.description)))
        }
    }
}

fn fold_case(s: &str) -> String {
    s.to_lowercase()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_list() -> TaskList {
        let mut list = TaskList::new();
        add_task(&mut list, "water plants", "2025-05-03", "08:00").unwrap();
        add_task(&mut list, "Buy milk", "2025-05-01", "18:30").unwrap();
        add_task(&mut list, "call Bank", "2025-05-01", "09:15").unwrap();
        list
    }

    fn descriptions(list: &TaskList) -> Vec<&str> {
        list.iter().map(|(_, t)| t.description.as_str()).collect()
    }

    // --- Validation ---

    #[test]
    fn test_parse_date_accepts_fixed_format() {
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            parse_date(" 2024-01-01 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_parse_date_rejects_other_shapes() {
        for bad in ["2024-1-01", "24-01-01", "2024/01/01", "01-01-2024", "2023-02-29", "tomorrow"] {
            assert_eq!(
                parse_date(bad),
                Err(ValidationError::InvalidDate(bad.to_string())),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_parse_time_24_hour() {
        assert_eq!(parse_time("09:00").unwrap(), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(parse_time("9:05").unwrap(), NaiveTime::from_hms_opt(9, 5, 0).unwrap());
        assert_eq!(parse_time("23:59").unwrap(), NaiveTime::from_hms_opt(23, 59, 0).unwrap());
        for bad in ["24:00", "12:60", "9am", "09:00:00", "0900", "12:5"] {
            assert!(parse_time(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_missing_fields_reported_first() {
        assert_eq!(
            validate_new_task("", "garbage", "garbage"),
            Err(ValidationError::MissingField(Field::Description))
        );
        assert_eq!(
            validate_new_task("x", "  ", "09:00"),
            Err(ValidationError::MissingField(Field::Date))
        );
        assert_eq!(
            validate_new_task("x", "2025-01-01", ""),
            Err(ValidationError::MissingField(Field::Time))
        );
    }

    #[test]
    fn test_description_trimmed() {
        let task = validate_new_task("  Buy milk  ", "2024-01-01", "09:00").unwrap();
        assert_eq!(task.description, "Buy milk");
        assert_eq!(task.status, TaskStatus::Pending);
    }

    // --- Add ---

    #[test]
    fn test_add_grows_by_one_pending() {
        let mut list = sample_list();
        let before = list.len();
        let id = add_task(&mut list, "New", "2025-06-01", "10:00").unwrap();
        assert_eq!(list.len(), before + 1);
        assert_eq!(id, "4");
        assert_eq!(list.get(&id).unwrap().status, TaskStatus::Pending);
        assert_eq!(list.position(&id), Some(before));
    }

    #[test]
    fn test_add_invalid_leaves_list_unchanged() {
        let mut list = sample_list();
        let before = list.clone();
        for (d, date, time) in [
            ("", "2025-01-01", "09:00"),
            ("x", "2025-02-30", "09:00"),
            ("x", "2025-01-01", "25:00"),
        ] {
            let err = add_task(&mut list, d, date, time).unwrap_err();
            assert!(matches!(err, TaskError::Validation(_)));
            assert_eq!(list, before);
        }
        // The counter was not consumed either
        assert_eq!(add_task(&mut list, "d", "2025-01-04", "09:00").unwrap(), "4");
    }

    // --- Complete ---

    #[test]
    fn test_complete_sets_completed() {
        let mut list = sample_list();
        complete_task(&mut list, "2").unwrap();
        assert_eq!(list.get("2").unwrap().status, TaskStatus::Completed);
        assert_eq!(list.get("1").unwrap().status, TaskStatus::Pending);
    }

    #[test]
    fn test_complete_is_idempotent() {
        let mut once = sample_list();
        complete_task(&mut once, "1").unwrap();

        let mut twice = sample_list();
        complete_task(&mut twice, "1").unwrap();
        complete_task(&mut twice, "1").unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_complete_unknown_id() {
        let mut list = sample_list();
        assert_eq!(
            complete_task(&mut list, "99"),
            Err(TaskError::NotFound("99".into()))
        );
    }

    // --- Delete ---

    #[test]
    fn test_delete_removes_only_target() {
        let mut list = sample_list();
        let removed = delete_task(&mut list, "2").unwrap();
        assert_eq!(removed.description, "Buy milk");
        assert_eq!(list.len(), 2);
        assert!(!list.contains("2"));
        assert_eq!(descriptions(&list), vec!["water plants", "call Bank"]);
    }

    #[test]
    fn test_delete_unknown_id_leaves_list() {
        let mut list = sample_list();
        let before = list.clone();
        assert_eq!(
            delete_task(&mut list, "7").unwrap_err(),
            TaskError::NotFound("7".into())
        );
        assert_eq!(list, before);
    }

    #[test]
    fn test_add_after_delete_does_not_collide() {
        let mut list = sample_list();
        delete_task(&mut list, "2").unwrap();
        let id = add_task(&mut list, "again", "2025-01-01", "09:00").unwrap();
        assert_eq!(id, "4");
        assert_eq!(list.len(), 3);
        assert_eq!(list.get("3").unwrap().description, "call Bank");
    }

    // --- Sort ---

    #[test]
    fn test_sort_by_date_then_time() {
        let mut list = sample_list();
        sort_tasks(&mut list, SortKey::Date);
        assert_eq!(descriptions(&list), vec!["call Bank", "Buy milk", "water plants"]);
        let keys: Vec<_> = list.iter().map(|(_, t)| (t.date, t.time)).collect();
        assert!(keys.windows(2).all(|w| w[0] <= w[1]));
        // Identity stays with the key
        assert_eq!(list.get("3").unwrap().description, "call Bank");
    }

    #[test]
    fn test_sort_alphabetical_ignores_case() {
        let mut list = sample_list();
        sort_tasks(&mut list, SortKey::Alphabetical);
        assert_eq!(descriptions(&list), vec!["Buy milk", "call Bank", "water plants"]);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let mut list = TaskList::new();
        add_task(&mut list, "same", "2025-01-01", "09:00").unwrap();
        add_task(&mut list, "Same", "2025-01-01", "09:00").unwrap();
        add_task(&mut list, "SAME", "2025-01-01", "09:00").unwrap();

        sort_tasks(&mut list, SortKey::Alphabetical);
        let ids: Vec<&str> = list.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);

        sort_tasks(&mut list, SortKey::Date);
        let ids: Vec<&str> = list.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }
}
