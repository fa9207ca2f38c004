// Board filtering and due-date ordering

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::task::{Priority, Task};

/// Filter for projecting the board
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Only tasks with this priority
    pub priority: Option<Priority>,
    /// Only tasks carrying this tag
    pub tag: Option<String>,
    /// Order over due date
    pub sort: SortOrder,
}

impl TaskFilter {
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Tags are stored lowercase, so the wanted tag is normalized the same way.
    /// A blank tag means "all tags" and clears the tag filter.
    pub fn tag(mut self, tag: impl AsRef<str>) -> Self {
        let tag = tag.as_ref().trim().to_lowercase();
        self.tag = if tag.is_empty() { None } else { Some(tag) };
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn matches(&self, task: &Task) -> bool {
        if self.priority.is_some_and(|p| p != task.priority) {
            return false;
        }
        match &self.tag {
            Some(tag) => task.tags.contains(tag),
            None => true,
        }
    }
}

/// Due-date sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Comparator for a stable sort; descending flips the comparison rather
    /// than reversing afterwards, so equal due dates keep collection order
    pub fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            SortOrder::Asc => a.due_date.cmp(&b.due_date),
            SortOrder::Desc => b.due_date.cmp(&a.due_date),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order: {} (expected asc or desc)", other)),
        }
    }
}
