// SprintBoard - single-user kanban task board with JSONL/SQLite persistence

pub mod clock;
pub mod config;
pub mod error;
pub mod filter;
pub mod jsonl;
pub mod projection;
pub mod record;
pub mod shared;
pub mod slot;
pub mod sqlite;
pub mod store;
pub mod task;

// Re-export main types for convenience
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Backend, Config, Overrides};
pub use error::{BlockReason, PersistError, StoreError, ValidationError};
pub use filter::{SortOrder, TaskFilter};
pub use projection::{Projection, TaskView};
pub use record::Record;
pub use shared::SharedTaskStore;
pub use slot::{JsonlSlot, MemorySlot, Slot};
pub use sqlite::SqliteSlot;
pub use store::TaskStore;
pub use task::{Priority, Status, Task, TaskInput, normalize_tags};
