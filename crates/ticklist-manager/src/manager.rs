use chrono::{DateTime, Utc};
use ticklist_core::{
    confirm::{ConfirmRequest, Confirmer},
    notify::{Notice, Notifier},
    storage::KeyValueStore,
    todos::{Category, Priority, TodoItem},
};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::TodoError,
    filter::{CategoryFilter, StatusFilter, ViewFilter},
    repo::TodoRepo,
    stats::Stats,
    transfer::{self, ExportBundle},
};

const IMPORT_FAILED: &str = "Error importing todos. Please check the file format.";

/// Defaults applied when a caller leaves an attribute unspecified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManagerSettings {
    pub default_category: Category,
    pub default_priority: Priority,
}

/// Result of a confirmation-gated operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The change went through and touched `affected` items.
    Applied { affected: usize },
    /// The user said no; nothing changed.
    Declined,
    /// There was nothing to do; the user was not asked.
    Unchanged,
}

/// Owns the todo collection and its view filters, and mirrors every mutation
/// to the store before returning.
pub struct TodoListManager<S: KeyValueStore> {
    repo: TodoRepo<S>,
    todos: Vec<TodoItem>,
    filter: ViewFilter,
    settings: ManagerSettings,
    notifier: Box<dyn Notifier>,
}

impl<S: KeyValueStore> TodoListManager<S> {
    /// Read the saved collection (empty when nothing is stored yet).
    pub fn load(
        store: S,
        notifier: Box<dyn Notifier>,
        settings: ManagerSettings,
    ) -> Result<Self, TodoError> {
        let repo = TodoRepo::new(store);
        let todos = repo.load()?;
        debug!(count = todos.len(), "loaded todos");
        Ok(Self {
            repo,
            todos,
            filter: ViewFilter::default(),
            settings,
            notifier,
        })
    }

    /// Full collection, newest first, ignoring filters.
    pub fn todos(&self) -> &[TodoItem] {
        &self.todos
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn settings(&self) -> &ManagerSettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        self.repo.store()
    }

    pub fn find(&self, id: &str) -> Option<&TodoItem> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Exact id match, or the single item whose id starts with `prefix`.
    pub fn resolve(&self, prefix: &str) -> Option<&TodoItem> {
        if prefix.is_empty() {
            return None;
        }
        if let Some(exact) = self.find(prefix) {
            return Some(exact);
        }
        let mut matches = self.todos.iter().filter(|t| t.id.starts_with(prefix));
        match (matches.next(), matches.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }

    #[instrument(skip(self))]
    pub fn add(
        &mut self,
        text: &str,
        category: Option<Category>,
        priority: Option<Priority>,
    ) -> Result<TodoItem, TodoError> {
        let text = self.require_text(text)?;
        let todo = TodoItem::new(
            text,
            category.unwrap_or(self.settings.default_category),
            priority.unwrap_or(self.settings.default_priority),
        );
        self.todos.insert(0, todo.clone());
        self.persist()?;
        info!(id = %todo.id, "todo added");
        self.notifier.notify(Notice::success("Todo added successfully!"));
        Ok(todo)
    }

    /// Flip completion. `Ok(None)` when the id is unknown.
    #[instrument(skip(self))]
    pub fn toggle_complete(&mut self, id: &str) -> Result<Option<TodoItem>, TodoError> {
        self.toggle_complete_at(id, Utc::now())
    }

    fn toggle_complete_at(
        &mut self,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<TodoItem>, TodoError> {
        let Some(todo) = self.todos.iter_mut().find(|t| t.id == id) else {
            debug!("toggle ignored: no such todo");
            return Ok(None);
        };
        let completed = !todo.completed;
        todo.set_completed(completed, now);
        let updated = todo.clone();
        self.persist()?;
        Ok(Some(updated))
    }

    /// Replace text and category. Blank text is rejected even for unknown ids.
    #[instrument(skip(self))]
    pub fn edit(
        &mut self,
        id: &str,
        text: &str,
        category: Category,
    ) -> Result<Option<TodoItem>, TodoError> {
        let text = self.require_text(text)?;
        let Some(todo) = self.todos.iter_mut().find(|t| t.id == id) else {
            debug!("edit ignored: no such todo");
            return Ok(None);
        };
        todo.text = text;
        todo.category = category;
        let updated = todo.clone();
        self.persist()?;
        self.notifier
            .notify(Notice::success("Todo updated successfully!"));
        Ok(Some(updated))
    }

    #[instrument(skip(self))]
    pub fn set_priority(
        &mut self,
        id: &str,
        priority: Priority,
    ) -> Result<Option<TodoItem>, TodoError> {
        let Some(todo) = self.todos.iter_mut().find(|t| t.id == id) else {
            debug!("priority change ignored: no such todo");
            return Ok(None);
        };
        todo.priority = priority;
        let updated = todo.clone();
        self.persist()?;
        Ok(Some(updated))
    }

    #[instrument(skip(self, confirm))]
    pub fn delete(&mut self, id: &str, confirm: &mut dyn Confirmer) -> Result<Outcome, TodoError> {
        let Some(idx) = self.todos.iter().position(|t| t.id == id) else {
            debug!("delete ignored: no such todo");
            return Ok(Outcome::Unchanged);
        };
        let request = ConfirmRequest::DeleteTodo {
            text: self.todos[idx].text.clone(),
        };
        if !confirm.confirm(&request) {
            return Ok(Outcome::Declined);
        }
        self.todos.remove(idx);
        self.persist()?;
        self.notifier.notify(Notice::success("Todo deleted"));
        Ok(Outcome::Applied { affected: 1 })
    }

    #[instrument(skip_all)]
    pub fn clear_completed(&mut self, confirm: &mut dyn Confirmer) -> Result<Outcome, TodoError> {
        let count = self.todos.iter().filter(|t| t.completed).count();
        if count == 0 {
            self.notifier
                .notify(Notice::info("No completed todos to clear"));
            return Ok(Outcome::Unchanged);
        }
        if !confirm.confirm(&ConfirmRequest::ClearCompleted { count }) {
            return Ok(Outcome::Declined);
        }
        self.todos.retain(|t| !t.completed);
        self.persist()?;
        self.notifier.notify(Notice::success(format!(
            "{count} completed todo(s) deleted"
        )));
        Ok(Outcome::Applied { affected: count })
    }

    #[instrument(skip_all)]
    pub fn clear_all(&mut self, confirm: &mut dyn Confirmer) -> Result<Outcome, TodoError> {
        let count = self.todos.len();
        if count == 0 {
            self.notifier.notify(Notice::info("No todos to clear"));
            return Ok(Outcome::Unchanged);
        }
        if !confirm.confirm(&ConfirmRequest::ClearAll { count }) {
            return Ok(Outcome::Declined);
        }
        self.todos.clear();
        self.persist()?;
        self.notifier.notify(Notice::success("All todos deleted"));
        Ok(Outcome::Applied { affected: count })
    }

    pub fn filters(&self) -> &ViewFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, status: StatusFilter) {
        self.filter.status = status;
    }

    pub fn set_category_filter(&mut self, category: CategoryFilter) {
        self.filter.category = category;
    }

    pub fn set_search(&mut self, term: &str) {
        self.filter.set_search(term);
    }

    /// Items passing the current filters, in collection order. Recomputed on
    /// every call.
    pub fn filtered_view(&self) -> impl Iterator<Item = &TodoItem> + '_ {
        self.todos.iter().filter(move |t| self.filter.matches(t))
    }

    pub fn stats(&self) -> Stats {
        Stats::from_items(&self.todos)
    }

    /// Snapshot of the whole collection (filters ignored) tagged with `now`'s date.
    pub fn export(&self, now: DateTime<Utc>) -> Result<ExportBundle, TodoError> {
        transfer::export(&self.todos, now)
    }

    /// Replace the collection with `payload` after validating it and asking.
    #[instrument(skip_all, fields(bytes = payload.len()))]
    pub fn import(
        &mut self,
        payload: &str,
        confirm: &mut dyn Confirmer,
    ) -> Result<Outcome, TodoError> {
        let incoming = match transfer::parse_import(payload) {
            Ok(todos) => todos,
            Err(err) => {
                warn!(error = %err, "rejected import payload");
                self.notifier.notify(Notice::error(IMPORT_FAILED));
                return Err(err);
            }
        };
        let request = ConfirmRequest::ReplaceAll {
            existing: self.todos.len(),
            incoming: incoming.len(),
        };
        if !confirm.confirm(&request) {
            return Ok(Outcome::Declined);
        }
        let affected = incoming.len();
        self.todos = incoming;
        self.persist()?;
        self.notifier
            .notify(Notice::success("Todos imported successfully!"));
        Ok(Outcome::Applied { affected })
    }

    fn require_text(&self, text: &str) -> Result<String, TodoError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.notifier.notify(Notice::error("Please enter a todo item"));
            return Err(TodoError::EmptyText);
        }
        Ok(trimmed.to_string())
    }

    /// Write-through of the whole collection. On failure the in-memory change
    /// stays and the caller gets the error.
    fn persist(&self) -> Result<(), TodoError> {
        if let Err(err) = self.repo.save(&self.todos) {
            warn!(error = %err, "failed to save todos");
            self.notifier
                .notify(Notice::error(format!("Could not save todos: {err}")));
            return Err(err);
        }
        Ok(())
    }
}
