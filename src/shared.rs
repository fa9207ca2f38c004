// Thread-safe handle: one lock around every board command

use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::error::StoreError;
use crate::filter::TaskFilter;
use crate::slot::Slot;
use crate::store::TaskStore;
use crate::task::{Status, Task, TaskInput};

/// Cloneable handle sharing one [`TaskStore`] between threads
///
/// Commands are not designed to interleave (the duplicate check is a
/// read-modify-write), so each call holds the lock for its whole duration.
pub struct SharedTaskStore<S: Slot, C: Clock = SystemClock> {
    inner: Arc<Mutex<TaskStore<S, C>>>,
}

impl<S: Slot, C: Clock> Clone for SharedTaskStore<S, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Slot, C: Clock> SharedTaskStore<S, C> {
    pub fn new(store: TaskStore<S, C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Run `f` with exclusive access to the store
    pub fn with<R>(&self, f: impl FnOnce(&mut TaskStore<S, C>) -> R) -> R {
        let mut store = self.inner.lock();
        f(&mut store)
    }

    pub fn create(&self, input: &TaskInput) -> Result<Task, StoreError> {
        self.with(|store| store.create(input))
    }

    pub fn edit(&self, id: &str, input: &TaskInput) -> Result<Task, StoreError> {
        self.with(|store| store.edit(id, input))
    }

    pub fn delete(&self, id: &str) -> Result<Task, StoreError> {
        self.with(|store| store.delete(id))
    }

    pub fn move_to(&self, id: &str, status: Status, confirm_overdue: bool) -> Result<Task, StoreError> {
        self.with(|store| store.move_to(id, status, confirm_overdue))
    }

    /// Owned snapshot of a projection, paired with each task's overdue flag
    pub fn query(&self, filter: &TaskFilter) -> Vec<(Task, bool)> {
        self.with(|store| {
            store
                .query(filter)
                .iter()
                .map(|view| (view.task.clone(), view.overdue))
                .collect()
        })
    }

    pub fn distinct_tags(&self) -> BTreeSet<String> {
        self.with(|store| store.distinct_tags())
    }

    pub fn len(&self) -> usize {
        self.with(|store| store.len())
    }

    pub fn is_empty(&self) -> bool {
        self.with(|store| store.is_empty())
    }
}
