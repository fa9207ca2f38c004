// Error types returned by board commands

use chrono::NaiveDate;
use thiserror::Error;

/// A task input rule that was violated
///
/// Checks run in declaration order and the first failure is reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title must be 5-60 characters (got {len})")]
    TitleLength { len: usize },

    #[error("description must be at most 150 characters (got {len})")]
    DescriptionLength { len: usize },

    #[error("due date {due} is in the past (today is {today})")]
    PastDueDate { due: NaiveDate, today: NaiveDate },

    #[error("a task titled {title:?} is already due on {due}")]
    DuplicateTitleDate { title: String, due: NaiveDate },
}

/// Why a move was refused without mutating anything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BlockReason {
    #[error("task is overdue; moving it to Done needs confirmation")]
    OverdueConfirmationRequired,
}

/// Failure writing a collection to its slot
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("slot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode records: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("slot database failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid slot key: {0}")]
    InvalidKey(String),
}

/// Everything a board command can fail with
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("task not found: {id}")]
    NotFound { id: String },

    #[error("move of task {id} blocked: {reason}")]
    Blocked { id: String, reason: BlockReason },

    #[error("failed to persist tasks: {0}")]
    Persist(#[from] PersistError),
}

impl StoreError {
    pub(crate) fn not_found(id: &str) -> Self {
        StoreError::NotFound { id: id.to_string() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, StoreError::Blocked { .. })
    }

    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            StoreError::Validation(e) => Some(e),
            _ => None,
        }
    }
}
