use thiserror::Error;
use ticklist_core::storage::StoreError;

/// Failures surfaced by `TodoListManager`. None of them are fatal; state is
/// left as documented on each operation.
#[derive(Debug, Error)]
pub enum TodoError {
    /// Text was empty or whitespace-only.
    #[error("todo text must not be empty")]
    EmptyText,
    /// Import payload or stored blob was not a list of well-formed todo records.
    #[error("invalid todo data: {reason}")]
    Format { reason: String },
    /// The persisted blob could not be decoded on load.
    #[error("stored todos are unreadable: {0}")]
    Corrupt(#[source] serde_json::Error),
    /// Serializing the collection failed.
    #[error("failed to encode todos: {0}")]
    Encode(#[source] serde_json::Error),
    /// Writing the mirror to the store failed. In-memory state already reflects the change.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl TodoError {
    pub(crate) fn format(reason: impl Into<String>) -> Self {
        TodoError::Format {
            reason: reason.into(),
        }
    }
}
