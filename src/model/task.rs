use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Task completion status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    /// Label shown in the status column
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Completed => "Completed",
        }
    }
}

/// How pressing a task is, derived from its status and due time.
/// Never stored; recomputed against the current clock on every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    /// Status is Completed, regardless of due time
    Completed,
    /// Pending and due strictly before now
    Overdue,
    /// Pending and due now or later
    Upcoming,
}

impl Urgency {
    pub fn classify(status: TaskStatus, due: NaiveDateTime, now: NaiveDateTime) -> Urgency {
        if status == TaskStatus::Completed {
            Urgency::Completed
        } else if due < now {
            Urgency::Overdue
        } else {
            Urgency::Upcoming
        }
    }
}

/// A single to-do entry. The identifier is the key it is stored under,
/// not a field of the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(alias = "Work")]
    pub description: String,
    /// Due date, `YYYY-MM-DD` on disk
    #[serde(alias = "Date")]
    pub date: NaiveDate,
    /// Due time of day, `HH:MM` on disk
    #[serde(alias = "Time", with = "hhmm")]
    pub time: NaiveTime,
    #[serde(alias = "Status")]
    pub status: TaskStatus,
}

impl Task {
    /// Create a new pending task
    pub fn new(description: String, date: NaiveDate, time: NaiveTime) -> Self {
        Task {
            description,
            date,
            time,
            status: TaskStatus::Pending,
        }
    }

    /// Due date and time combined into one timestamp
    pub fn due(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    pub fn urgency(&self, now: NaiveDateTime) -> Urgency {
        Urgency::classify(self.status, self.due(), now)
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn time_str(&self) -> String {
        self.time.format(hhmm::FORMAT).to_string()
    }
}

/// Serde adapter for minute-precision times. Seconds are accepted on read
/// so hand-edited files still load.
mod hhmm {
    use chrono::NaiveTime;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date, time), "%Y-%m-%d %H:%M").unwrap()
    }

    fn task(date: &str, time: &str) -> Task {
        Task::new(
            "Something".into(),
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
        )
    }

    #[test]
    fn completed_is_green_regardless_of_due() {
        let now = at("2030-01-01", "00:00");
        let due_past = at("2020-01-01", "09:00");
        let due_future = at("2099-01-01", "09:00");
        assert_eq!(
            Urgency::classify(TaskStatus::Completed, due_past, now),
            Urgency::Completed
        );
        assert_eq!(
            Urgency::classify(TaskStatus::Completed, due_future, now),
            Urgency::Completed
        );
    }

    #[test]
    fn pending_before_now_is_overdue() {
        let now = at("2030-01-01", "00:00");
        assert_eq!(
            Urgency::classify(TaskStatus::Pending, at("2024-01-01", "09:00"), now),
            Urgency::Overdue
        );
    }

    #[test]
    fn pending_at_or_after_now_is_upcoming() {
        let now = at("2025-06-01", "12:00");
        assert_eq!(
            Urgency::classify(TaskStatus::Pending, now, now),
            Urgency::Upcoming
        );
        assert_eq!(
            Urgency::classify(TaskStatus::Pending, at("2025-06-01", "12:01"), now),
            Urgency::Upcoming
        );
    }

    #[test]
    fn same_day_compares_time_of_day() {
        // Earlier date but later clock time must still be overdue, and a
        // later time on the same day must not be.
        let now = at("2025-06-01", "12:00");
        assert_eq!(task("2025-06-01", "11:59").urgency(now), Urgency::Overdue);
        assert_eq!(task("2025-06-01", "13:00").urgency(now), Urgency::Upcoming);
        assert_eq!(task("2025-05-31", "23:00").urgency(now), Urgency::Overdue);
    }

    #[test]
    fn serializes_with_hour_minute_time() {
        let json = serde_json::to_value(task("2024-01-01", "09:00")).unwrap();
        assert_eq!(json["date"], "2024-01-01");
        assert_eq!(json["time"], "09:00");
        assert_eq!(json["status"], "Pending");
    }

    #[test]
    fn deserializes_capitalized_keys() {
        let t: Task = serde_json::from_str(
            r#"{"Work": "Buy milk", "Date": "2024-01-01", "Time": "09:00", "Status": "Completed"}"#,
        )
        .unwrap();
        assert_eq!(t.description, "Buy milk");
        assert_eq!(t.time_str(), "09:00");
        assert_eq!(t.status, TaskStatus::Completed);
    }

    #[test]
    fn deserializes_time_with_seconds() {
        let t: Task = serde_json::from_str(
            r#"{"description": "x", "date": "2024-01-01", "time": "09:30:00", "status": "Pending"}"#,
        )
        .unwrap();
        assert_eq!(t.time_str(), "09:30");
    }

    #[test]
    fn rejects_unknown_status() {
        let result: Result<Task, _> = serde_json::from_str(
            r#"{"description": "x", "date": "2024-01-01", "time": "09:30", "status": "Doing"}"#,
        );
        assert!(result.is_err());
    }
}
