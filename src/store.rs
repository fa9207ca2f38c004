// Task board state engine: validation, commands and projections

use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{debug, info};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::error::{BlockReason, StoreError, ValidationError};
use crate::filter::TaskFilter;
use crate::projection::Projection;
use crate::slot::Slot;
use crate::task::{
    DESCRIPTION_MAX_CHARS, Status, TITLE_MAX_CHARS, TITLE_MIN_CHARS, Task, TaskInput, normalize_tags,
};

/// Input fields after trimming and tag normalization
struct CheckedInput {
    title: String,
    description: String,
    tags: Vec<String>,
}

/// Authoritative task collection for one board
///
/// Loaded once from its [`Slot`] on open and written back after every
/// successful mutating command. A command that fails leaves both the
/// in-memory collection and the slot untouched.
pub struct TaskStore<S: Slot, C: Clock = SystemClock> {
    tasks: Vec<Task>,
    editing: Option<String>,
    slot: S,
    clock: C,
}

impl<S: Slot, C: Clock> TaskStore<S, C> {
    /// Open a store over `slot`, loading whatever collection it holds
    pub fn open(slot: S, clock: C) -> Self {
        let tasks: Vec<Task> = slot.load();
        info!(count = tasks.len(), "Opened task store");

        Self {
            tasks,
            editing: None,
            slot,
            clock,
        }
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    pub fn slot_mut(&mut self) -> &mut S {
        &mut self.slot
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// All tasks in insertion order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Create a task in the Backlog column
    pub fn create(&mut self, input: &TaskInput) -> Result<Task, StoreError> {
        let checked = self.check(input, None)?;

        let task = Task {
            id: self.fresh_id(),
            title: checked.title,
            description: checked.description,
            priority: input.priority,
            due_date: input.due_date,
            tags: checked.tags,
            status: Status::Backlog,
            created_at: self.clock.now(),
        };

        let mut next = self.tasks.clone();
        next.push(task.clone());
        self.commit(next)?;

        debug!(id = %task.id, title = %task.title, "create: task added");
        Ok(task)
    }

    /// Replace a task's editable fields; status and creation time are kept
    pub fn edit(&mut self, id: &str, input: &TaskInput) -> Result<Task, StoreError> {
        let index = self.position(id)?;
        let checked = self.check(input, Some(id))?;

        let mut next = self.tasks.clone();
        let task = &mut next[index];
        task.title = checked.title;
        task.description = checked.description;
        task.priority = input.priority;
        task.due_date = input.due_date;
        task.tags = checked.tags;
        let updated = task.clone();

        self.commit(next)?;

        debug!(id, "edit: task updated");
        Ok(updated)
    }

    /// Remove a task, returning it
    pub fn delete(&mut self, id: &str) -> Result<Task, StoreError> {
        let index = self.position(id)?;

        let mut next = self.tasks.clone();
        let removed = next.remove(index);
        self.commit(next)?;

        debug!(id, "delete: task removed");
        Ok(removed)
    }

    /// Move a task to any column
    ///
    /// Moving an overdue task into Done returns [`StoreError::Blocked`] unless
    /// `confirm_overdue` is set; the caller can ask the user and call again.
    pub fn move_to(&mut self, id: &str, status: Status, confirm_overdue: bool) -> Result<Task, StoreError> {
        let index = self.position(id)?;

        let today = self.today();
        if status == Status::Done && self.tasks[index].due_date < today && !confirm_overdue {
            debug!(id, "move: overdue task needs confirmation");
            return Err(StoreError::Blocked {
                id: id.to_string(),
                reason: BlockReason::OverdueConfirmationRequired,
            });
        }

        let mut next = self.tasks.clone();
        next[index].status = status;
        let moved = next[index].clone();
        self.commit(next)?;

        debug!(id, %status, "move: task moved");
        Ok(moved)
    }

    // ========================================================================
    // Edit target
    // ========================================================================

    /// Mark a task as the one the form is editing, returning its pre-filled fields
    pub fn begin_edit(&mut self, id: &str) -> Result<TaskInput, StoreError> {
        let task = self.get(id).ok_or_else(|| StoreError::not_found(id))?;
        let input = TaskInput::from_task(task);
        self.editing = Some(id.to_string());
        Ok(input)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Task currently being edited, if it still exists
    pub fn editing(&self) -> Option<&Task> {
        self.editing.as_deref().and_then(|id| self.get(id))
    }

    /// Apply the form: edit the active target if there is one, otherwise create
    ///
    /// The target is cleared only when the command succeeds.
    pub fn submit(&mut self, input: &TaskInput) -> Result<Task, StoreError> {
        let result = match self.editing.clone() {
            Some(id) => self.edit(&id, input),
            None => self.create(input),
        };
        if result.is_ok() {
            self.editing = None;
        }
        result
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Filtered, due-date ordered view; ties keep insertion order
    pub fn query(&self, filter: &TaskFilter) -> Projection<'_> {
        let mut entries: Vec<&Task> = self.tasks.iter().filter(|t| filter.matches(t)).collect();
        // sort_by is stable
        entries.sort_by(|a, b| filter.sort.compare(a, b));
        Projection::new(entries, self.today())
    }

    /// Every tag used on the board
    pub fn distinct_tags(&self) -> BTreeSet<String> {
        self.tasks.iter().flat_map(|t| t.tags.iter().cloned()).collect()
    }

    pub fn is_overdue(&self, task: &Task) -> bool {
        task.is_overdue(self.today())
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    fn position(&self, id: &str) -> Result<usize, StoreError> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| StoreError::not_found(id))
    }

    /// Validate in order; the first failing rule is reported
    fn check(&self, input: &TaskInput, exempt_id: Option<&str>) -> Result<CheckedInput, ValidationError> {
        let title = input.title.trim();
        let len = title.chars().count();
        if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&len) {
            return Err(ValidationError::TitleLength { len });
        }

        let description = input.description.trim();
        let len = description.chars().count();
        if len > DESCRIPTION_MAX_CHARS {
            return Err(ValidationError::DescriptionLength { len });
        }

        let today = self.today();
        if input.due_date < today {
            return Err(ValidationError::PastDueDate {
                due: input.due_date,
                today,
            });
        }

        if self.is_duplicate(title, input.due_date, exempt_id) {
            return Err(ValidationError::DuplicateTitleDate {
                title: title.to_string(),
                due: input.due_date,
            });
        }

        Ok(CheckedInput {
            title: title.to_string(),
            description: description.to_string(),
            tags: normalize_tags(&input.tags),
        })
    }

    fn is_duplicate(&self, title: &str, due_date: NaiveDate, exempt_id: Option<&str>) -> bool {
        let title = title.to_lowercase();
        self.tasks.iter().any(|t| {
            t.due_date == due_date && t.title.trim().to_lowercase() == title && Some(t.id.as_str()) != exempt_id
        })
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::now_v7().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    /// Persist the next collection, then adopt it
    fn commit(&mut self, next: Vec<Task>) -> Result<(), StoreError> {
        self.slot.save(&next)?;
        self.tasks = next;
        Ok(())
    }
}
