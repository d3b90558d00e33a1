use ticklist_core::{
    storage::{KeyValueStore, StoreError},
    todos::TodoItem,
};
use tracing::{debug, instrument};

use crate::{error::TodoError, transfer::check_records};

/// Store key holding the whole collection.
pub const TODOS_KEY: &str = "todos";

/// Whole-collection persistence over a `KeyValueStore`. No deltas: every save
/// rewrites the full list.
pub struct TodoRepo<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> TodoRepo<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    #[instrument(skip(self))]
    pub fn load(&self) -> Result<Vec<TodoItem>, TodoError> {
        match self.store.get(TODOS_KEY) {
            Ok(blob) if blob.trim().is_empty() => Ok(Vec::new()),
            Ok(blob) => {
                let todos: Vec<TodoItem> =
                    serde_json::from_str(&blob).map_err(TodoError::Corrupt)?;
                check_records(&todos)?;
                Ok(todos)
            }
            Err(StoreError::NotFound { .. }) => {
                debug!("no saved todos yet");
                Ok(Vec::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    #[instrument(skip_all, fields(count = todos.len()))]
    pub fn save(&self, todos: &[TodoItem]) -> Result<(), TodoError> {
        let blob = serde_json::to_string(todos).map_err(TodoError::Encode)?;
        self.store.put(TODOS_KEY, &blob)?;
        Ok(())
    }
}
