use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ticklist_core::{
    confirm::ConfirmRequest,
    notify::{Notice, RecordingNotifier},
    storage::{KeyValueStore, StoreError},
    todos::{Category, Priority, TodoItem},
};
use ticklist_manager::{TodoError, TodoListManager};
use tracing::debug;

/// Store key for the light/dark preference; unrelated to the todo data.
pub const THEME_KEY: &str = "ui.dark-mode";

/// What the keyboard is currently driving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Adding { input: String, category: Category },
    Editing { id: String, input: String, category: Category },
    Searching,
    Confirming { request: ConfirmRequest, action: Pending },
}

/// A destructive action parked until the user answers y/n.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pending {
    Delete(String),
    ClearCompleted,
    ClearAll,
}

/// TUI state. Every frame is drawn from the manager's current state.
pub struct App<S: KeyValueStore> {
    pub manager: TodoListManager<S>,
    pub mode: Mode,
    pub selected: usize,
    pub notice: Option<Notice>,
    pub dark: bool,
    /// Search term as typed; the manager only keeps the lowercased form.
    pub search: String,
    notices: RecordingNotifier,
}

impl<S: KeyValueStore> App<S> {
    /// `notices` must be the notifier the manager was built with.
    pub fn new(manager: TodoListManager<S>, notices: RecordingNotifier) -> Self {
        let dark = load_dark_mode(manager.store());
        Self {
            manager,
            mode: Mode::Browse,
            selected: 0,
            notice: None,
            dark,
            search: String::new(),
            notices,
        }
    }

    pub fn visible(&self) -> Vec<&TodoItem> {
        self.manager.filtered_view().collect()
    }

    fn selected_id(&self) -> Option<String> {
        self.manager
            .filtered_view()
            .nth(self.selected)
            .map(|t| t.id.clone())
    }

    /// Apply one key press. Returns `false` when the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Notices last until the next key press.
        self.notice = None;
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        let keep_running = match self.mode.clone() {
            Mode::Browse => self.browse_key(key),
            Mode::Adding { input, category } => {
                self.mode = self.input_key(key, input, category, None);
                true
            }
            Mode::Editing {
                id,
                input,
                category,
            } => {
                self.mode = self.input_key(key, input, category, Some(id));
                true
            }
            Mode::Searching => {
                self.search_key(key);
                true
            }
            Mode::Confirming { action, .. } => {
                self.confirm_key(key, action);
                true
            }
        };
        self.collect_notice();
        self.clamp_selection();
        keep_running
    }

    fn browse_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Down | KeyCode::Char('j') => self.selected = self.selected.saturating_add(1),
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(id) = self.selected_id() {
                    report(self.manager.toggle_complete(&id));
                }
            }
            KeyCode::Char('a') => {
                self.mode = Mode::Adding {
                    input: String::new(),
                    category: self.manager.settings().default_category,
                };
            }
            KeyCode::Char('e') => {
                if let Some(todo) = self
                    .selected_id()
                    .and_then(|id| self.manager.find(&id).cloned())
                {
                    self.mode = Mode::Editing {
                        id: todo.id,
                        input: todo.text,
                        category: todo.category,
                    };
                }
            }
            KeyCode::Char('p') => {
                if let Some(todo) = self
                    .selected_id()
                    .and_then(|id| self.manager.find(&id).cloned())
                {
                    report(self.manager.set_priority(&todo.id, next_priority(todo.priority)));
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    let mut asked = None;
                    report(self.manager.delete(&id, &mut |req: &ConfirmRequest| {
                        asked = Some(req.clone());
                        false
                    }));
                    self.park(asked, Pending::Delete(id));
                }
            }
            KeyCode::Char('x') => {
                let mut asked = None;
                report(self.manager.clear_completed(&mut |req: &ConfirmRequest| {
                    asked = Some(req.clone());
                    false
                }));
                self.park(asked, Pending::ClearCompleted);
            }
            KeyCode::Char('X') => {
                let mut asked = None;
                report(self.manager.clear_all(&mut |req: &ConfirmRequest| {
                    asked = Some(req.clone());
                    false
                }));
                self.park(asked, Pending::ClearAll);
            }
            KeyCode::Char('f') => {
                let next = self.manager.filters().status.next();
                self.manager.set_filter(next);
            }
            KeyCode::Char('c') => {
                let next = self.manager.filters().category.next();
                self.manager.set_category_filter(next);
            }
            KeyCode::Char('/') => self.mode = Mode::Searching,
            KeyCode::Char('t') => self.toggle_theme(),
            _ => {}
        }
        true
    }

    /// Shared line editor for add and edit. Tab cycles the category.
    fn input_key(
        &mut self,
        key: KeyEvent,
        mut input: String,
        mut category: Category,
        editing: Option<String>,
    ) -> Mode {
        match key.code {
            KeyCode::Esc => return Mode::Browse,
            KeyCode::Enter => {
                let submitted = match &editing {
                    Some(id) => self.manager.edit(id, &input, category).map(|_| ()),
                    None => self.manager.add(&input, Some(category), None).map(|_| {
                        self.selected = 0;
                    }),
                };
                // Blank text keeps the editor open so the user can fix it.
                if !matches!(submitted, Err(TodoError::EmptyText)) {
                    report(submitted);
                    return Mode::Browse;
                }
            }
            KeyCode::Tab => category = next_category(category),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(ch) => input.push(ch),
            _ => {}
        }
        match editing {
            Some(id) => Mode::Editing {
                id,
                input,
                category,
            },
            None => Mode::Adding { input, category },
        }
    }

    fn search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.mode = Mode::Browse;
                return;
            }
            KeyCode::Esc => {
                self.search.clear();
                self.mode = Mode::Browse;
            }
            KeyCode::Backspace => {
                self.search.pop();
            }
            KeyCode::Char(ch) => self.search.push(ch),
            _ => return,
        }
        self.manager.set_search(&self.search);
        self.selected = 0;
    }

    fn confirm_key(&mut self, key: KeyEvent, action: Pending) {
        let approved = match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => true,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => false,
            _ => return,
        };
        self.mode = Mode::Browse;
        if !approved {
            return;
        }
        let mut yes = |_: &ConfirmRequest| true;
        match action {
            Pending::Delete(id) => report(self.manager.delete(&id, &mut yes)),
            Pending::ClearCompleted => report(self.manager.clear_completed(&mut yes)),
            Pending::ClearAll => report(self.manager.clear_all(&mut yes)),
        }
    }

    /// The manager asked for confirmation during a dry run: show the question.
    fn park(&mut self, asked: Option<ConfirmRequest>, action: Pending) {
        if let Some(request) = asked {
            self.mode = Mode::Confirming { request, action };
        }
    }

    fn toggle_theme(&mut self) {
        self.dark = !self.dark;
        let value = if self.dark { "true" } else { "false" };
        if let Err(err) = self.manager.store().put(THEME_KEY, value) {
            self.notice = Some(Notice::error(format!("Could not save theme: {err}")));
        }
    }

    fn collect_notice(&mut self) {
        if let Some(latest) = self.notices.drain().pop() {
            self.notice = Some(latest);
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.manager.filtered_view().count();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

/// Errors already reached the user as notices; just trace them.
fn report<T>(result: Result<T, TodoError>) {
    if let Err(err) = result {
        debug!(error = %err, "operation rejected");
    }
}

fn load_dark_mode<S: KeyValueStore>(store: &S) -> bool {
    match store.get(THEME_KEY) {
        Ok(value) => value.trim() != "false",
        Err(StoreError::NotFound { .. }) => true,
        Err(err) => {
            debug!(error = %err, "theme preference unavailable");
            true
        }
    }
}

fn next_category(current: Category) -> Category {
    let all = Category::ALL;
    let idx = all.iter().position(|c| *c == current).unwrap_or(0);
    all[(idx + 1) % all.len()]
}

fn next_priority(current: Priority) -> Priority {
    let all = Priority::ALL;
    let idx = all.iter().position(|p| *p == current).unwrap_or(0);
    all[(idx + 1) % all.len()]
}
