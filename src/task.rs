// Task model for the sprint board

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::record::Record;

pub const TITLE_MIN_CHARS: usize = 5;
pub const TITLE_MAX_CHARS: usize = 60;
pub const DESCRIPTION_MAX_CHARS: usize = 150;
pub const MAX_TAGS: usize = 5;

/// One card on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: Priority,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: Status,
    #[serde(with = "millis_rfc3339")]
    pub created_at: DateTime<Utc>,
}

/// `createdAt` is always written with three fractional digits, e.g. `2025-05-20T10:00:00.000Z`
mod millis_rfc3339 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

impl Task {
    /// Overdue is derived, never stored: due before `today` and not yet done
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date < today && self.status != Status::Done
    }

    /// Tags joined the way the edit form shows them
    pub fn tags_display(&self) -> String {
        self.tags.join(", ")
    }
}

impl Record for Task {
    fn id(&self) -> &str {
        &self.id
    }

    fn collection_name() -> &'static str {
        "sprint_tasks_v1"
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    P1,
    #[default]
    P2,
    P3,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::P1, Priority::P2, Priority::P3];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::P1 => "P1",
            Priority::P2 => "P2",
            Priority::P3 => "P3",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "P1" => Ok(Priority::P1),
            "P2" => Ok(Priority::P2),
            "P3" => Ok(Priority::P3),
            other => Err(format!("unknown priority: {} (expected P1, P2 or P3)", other)),
        }
    }
}

/// Board column a task sits in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Backlog,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
}

impl Status {
    /// Columns in board order
    pub const ALL: [Status; 3] = [Status::Backlog, Status::InProgress, Status::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Backlog => "Backlog",
            Status::InProgress => "In Progress",
            Status::Done => "Done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "backlog" => Ok(Status::Backlog),
            "in progress" | "in-progress" | "in_progress" | "inprogress" | "doing" => Ok(Status::InProgress),
            "done" => Ok(Status::Done),
            other => Err(format!(
                "unknown status: {} (expected backlog, in-progress or done)",
                other
            )),
        }
    }
}

/// Form fields submitted for create/edit
///
/// `tags` is the raw comma-separated string as typed; it is normalized by
/// [`normalize_tags`] when the command is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInput {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: NaiveDate,
    pub tags: String,
}

impl TaskInput {
    pub fn new(title: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            due_date,
            tags: String::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    /// Pre-fill the form from an existing task
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            due_date: task.due_date,
            tags: task.tags_display(),
        }
    }
}

/// Split on commas, trim, lowercase, drop empties, dedup (first seen wins), cap at five
pub fn normalize_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(|t| t.trim().to_lowercase()) {
        if tag.is_empty() || tags.contains(&tag) {
            continue;
        }
        tags.push(tag);
        if tags.len() == MAX_TAGS {
            break;
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> Task {
        Task {
            id: "t-1".to_string(),
            title: "Write release notes".to_string(),
            description: String::new(),
            priority: Priority::P1,
            due_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            tags: vec!["docs".to_string(), "release".to_string()],
            status: Status::Backlog,
            created_at: DateTime::parse_from_rfc3339("2025-03-01T09:30:00.125Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn test_normalize_tags() {
        assert_eq!(normalize_tags("A, a, B,,C,D,E,F"), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(normalize_tags(" Backend ,frontend,BACKEND"), vec!["backend", "frontend"]);
        assert!(normalize_tags("").is_empty());
        assert!(normalize_tags(" , ,,").is_empty());
    }

    #[test]
    fn test_overdue_is_derived() {
        let mut task = sample_task();
        let before = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let after = NaiveDate::from_ymd_opt(2025, 3, 11).unwrap();

        assert!(!task.is_overdue(before));
        assert!(task.is_overdue(after));

        task.status = Status::Done;
        assert!(!task.is_overdue(after));
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_string(&Status::InProgress).unwrap(), "\"In Progress\"");
        assert_eq!(serde_json::to_string(&Status::Backlog).unwrap(), "\"Backlog\"");
        let status: Status = serde_json::from_str("\"Done\"").unwrap();
        assert_eq!(status, Status::Done);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("In Progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!("in-progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!("DONE".parse::<Status>().unwrap(), Status::Done);
        assert!("archived".parse::<Status>().is_err());
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!("p1".parse::<Priority>().unwrap(), Priority::P1);
        assert_eq!(Priority::default(), Priority::P2);
        assert!("P4".parse::<Priority>().is_err());
    }

    #[test]
    fn test_task_serialization_uses_camel_case() {
        let task = sample_task();
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"dueDate\":\"2025-03-10\""));
        assert!(json.contains("\"createdAt\":\"2025-03-01T09:30:00.125Z\""));
        assert!(json.contains("\"priority\":\"P1\""));

        let deserialized: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, task);
    }

    #[test]
    fn test_created_at_keeps_zero_millis() {
        let mut task = sample_task();
        task.created_at = DateTime::parse_from_rfc3339("2025-05-20T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"createdAt\":\"2025-05-20T10:00:00.000Z\""));

        let bad = json.replace("2025-05-20T10:00:00.000Z", "yesterday");
        assert!(serde_json::from_str::<Task>(&bad).is_err());
    }

    #[test]
    fn test_input_from_task_prefills_tags() {
        let input = TaskInput::from_task(&sample_task());
        assert_eq!(input.tags, "docs, release");
        assert_eq!(normalize_tags(&input.tags), sample_task().tags);
    }

    #[test]
    fn test_collection_name() {
        assert_eq!(Task::collection_name(), "sprint_tasks_v1");
        assert_eq!(sample_task().id(), "t-1");
    }
}
