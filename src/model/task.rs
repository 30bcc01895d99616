use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::id;

/// Due date of a task, as the service describes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Due {
    /// `YYYY-MM-DD`, or a full datetime for tasks with a due time
    pub date: String,
    #[serde(default)]
    pub is_recurring: bool,
    /// Human-readable form, e.g. "every monday"
    #[serde(default)]
    pub string: String,
}

impl Due {
    /// The calendar date part of `date`, ignoring any time component.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        let day = self.date.get(..10)?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }
}

/// An active task as reported by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(deserialize_with = "id::deserialize")]
    pub id: String,
    pub content: String,
    #[serde(deserialize_with = "id::deserialize")]
    pub project_id: String,
    #[serde(default, deserialize_with = "id::deserialize_opt")]
    pub section_id: Option<String>,
    #[serde(default, deserialize_with = "id::deserialize_opt")]
    pub parent_id: Option<String>,
    /// 1 (normal) to 4 (urgent)
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default)]
    pub due: Option<Due>,
}

fn default_priority() -> u8 {
    1
}

impl Task {
    pub fn new(id: impl Into<String>, content: impl Into<String>, project_id: impl Into<String>) -> Self {
        Task {
            id: id.into(),
            content: content.into(),
            project_id: project_id.into(),
            section_id: None,
            parent_id: None,
            priority: default_priority(),
            due: None,
        }
    }

    pub fn is_subtask(&self) -> bool {
        self.parent_id.is_some()
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due.as_ref().and_then(Due::calendar_date)
    }

    pub fn is_recurring(&self) -> bool {
        self.due.as_ref().is_some_and(|d| d.is_recurring)
    }
}

/// Fields for a new task. Unset fields are left to the service defaults.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewTask {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
}

/// Partial update of an existing task. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_string: Option<String>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.priority.is_none() && self.due_string.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_service_task() {
        let json = r#"{
            "id": "2995104339",
            "content": "Buy milk",
            "project_id": 2203306141,
            "section_id": null,
            "parent_id": "2995104589",
            "priority": 4,
            "due": {"date": "2016-09-01", "is_recurring": true, "string": "every day"},
            "labels": ["food"]
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, "2995104339");
        assert_eq!(task.project_id, "2203306141");
        assert_eq!(task.section_id, None);
        assert_eq!(task.parent_id.as_deref(), Some("2995104589"));
        assert!(task.is_subtask());
        assert!(task.is_recurring());
        assert_eq!(task.due_date(), NaiveDate::from_ymd_opt(2016, 9, 1));
    }

    #[test]
    fn test_missing_optional_fields() {
        let task: Task =
            serde_json::from_str(r#"{"id": "1", "content": "x", "project_id": "9"}"#).unwrap();
        assert_eq!(task.priority, 1);
        assert!(task.due.is_none());
        assert!(!task.is_recurring());
    }

    #[test]
    fn test_calendar_date_ignores_time() {
        let due = Due {
            date: "2024-03-05T14:00:00".into(),
            is_recurring: false,
            string: "Mar 5 2pm".into(),
        };
        assert_eq!(due.calendar_date(), NaiveDate::from_ymd_opt(2024, 3, 5));
    }

    #[test]
    fn test_calendar_date_garbage() {
        let due = Due {
            date: "soon".into(),
            is_recurring: false,
            string: "soon".into(),
        };
        assert_eq!(due.calendar_date(), None);
    }

    #[test]
    fn test_update_serializes_only_set_fields() {
        let update = TaskUpdate {
            priority: Some(3),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"priority":3}"#);
        assert!(!update.is_empty());
        assert!(TaskUpdate::default().is_empty());
    }
}
