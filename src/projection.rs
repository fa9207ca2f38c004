// Read-only filtered/sorted view over the board

use chrono::NaiveDate;

use crate::task::{Status, Task};

/// A task as the board shows it, with the derived overdue flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskView<'a> {
    pub task: &'a Task,
    pub overdue: bool,
}

/// Result of [`TaskStore::query`](crate::store::TaskStore::query)
///
/// Holds borrowed tasks in their final order. `iter()` can be called any
/// number of times; the overdue flag is computed per item as it is yielded.
#[derive(Debug, Clone)]
pub struct Projection<'a> {
    entries: Vec<&'a Task>,
    today: NaiveDate,
}

impl<'a> Projection<'a> {
    pub(crate) fn new(entries: Vec<&'a Task>, today: NaiveDate) -> Self {
        Self { entries, today }
    }

    pub fn iter(&self) -> impl Iterator<Item = TaskView<'a>> + '_ {
        let today = self.today;
        self.entries.iter().map(move |&task| TaskView {
            task,
            overdue: task.is_overdue(today),
        })
    }

    /// Tasks for one board column, in projection order
    pub fn column(&self, status: Status) -> impl Iterator<Item = TaskView<'a>> + '_ {
        self.iter().filter(move |view| view.task.status == status)
    }

    pub fn ids(&self) -> Vec<&'a str> {
        self.entries.iter().map(|task| task.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Date the overdue flags are computed against
    pub fn today(&self) -> NaiveDate {
        self.today
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;
    use chrono::{TimeZone, Utc};

    fn task(id: &str, status: Status, day: u32) -> Task {
        Task {
            id: id.to_string(),
            title: format!("Projection {}", id),
            description: String::new(),
            priority: Priority::P2,
            due_date: NaiveDate::from_ymd_opt(2025, 8, day).unwrap(),
            tags: vec![],
            status,
            created_at: Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_projection_is_restartable() {
        let tasks = [task("a", Status::Backlog, 5), task("b", Status::Done, 6)];
        let projection = Projection::new(tasks.iter().collect(), NaiveDate::from_ymd_opt(2025, 8, 1).unwrap());

        let first: Vec<&str> = projection.iter().map(|v| v.task.id.as_str()).collect();
        let second: Vec<&str> = projection.iter().map(|v| v.task.id.as_str()).collect();
        assert_eq!(first, second);
        assert_eq!(projection.ids(), vec!["a", "b"]);
        assert_eq!(projection.len(), 2);
    }

    #[test]
    fn test_projection_overdue_and_columns() {
        let tasks = [
            task("late", Status::InProgress, 2),
            task("done-late", Status::Done, 2),
            task("future", Status::InProgress, 20),
        ];
        let projection = Projection::new(tasks.iter().collect(), NaiveDate::from_ymd_opt(2025, 8, 10).unwrap());
        assert_eq!(projection.today(), NaiveDate::from_ymd_opt(2025, 8, 10).unwrap());

        let overdue: Vec<&str> = projection
            .iter()
            .filter(|v| v.overdue)
            .map(|v| v.task.id.as_str())
            .collect();
        assert_eq!(overdue, vec!["late"]);

        assert_eq!(projection.column(Status::InProgress).count(), 2);
        assert_eq!(projection.column(Status::Done).count(), 1);
        assert_eq!(projection.column(Status::Backlog).count(), 0);
    }
}
