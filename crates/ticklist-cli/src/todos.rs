use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use ticklist_core::{confirm::Confirmer, storage::KeyValueStore, todos::TodoItem};
use ticklist_manager::{Outcome, Stats, TodoError, TodoListManager};
use tracing::debug;

use crate::{cli::Command, dates::describe_dates};

const SHORT_ID_LEN: usize = 8;

/// Execute a todo subcommand against an already-loaded manager.
pub fn handle<S: KeyValueStore>(
    cmd: Command,
    manager: &mut TodoListManager<S>,
    confirm: &mut dyn Confirmer,
) -> Result<()> {
    match cmd {
        Command::Add {
            text,
            category,
            priority,
        } => {
            if let Some(todo) = settle(manager.add(&text.join(" "), category, priority))? {
                println!("{}", render_line(&todo, Utc::now()));
            }
        }
        Command::List {
            status,
            category,
            search,
            json,
        } => {
            manager.set_filter(status);
            manager.set_category_filter(category);
            manager.set_search(search.as_deref().unwrap_or_default());
            let visible: Vec<&TodoItem> = manager.filtered_view().collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&visible)?);
            } else if visible.is_empty() {
                println!("{}", empty_message(manager));
            } else {
                for todo in visible {
                    println!("{}", render_line(todo, Utc::now()));
                }
            }
        }
        Command::Toggle { id } => {
            let id = resolve_id(manager, &id);
            match settle(manager.toggle_complete(&id))?.flatten() {
                Some(todo) => println!("{}", render_line(&todo, Utc::now())),
                None => not_found(&id),
            }
        }
        Command::Edit { id, text, category } => {
            let id = resolve_id(manager, &id);
            let category = match (category, manager.find(&id)) {
                (Some(category), _) => category,
                (None, Some(existing)) => existing.category,
                (None, None) => manager.settings().default_category,
            };
            match settle(manager.edit(&id, &text.join(" "), category))? {
                Some(Some(todo)) => println!("{}", render_line(&todo, Utc::now())),
                Some(None) => not_found(&id),
                None => {}
            }
        }
        Command::Priority { id, priority } => {
            let id = resolve_id(manager, &id);
            match settle(manager.set_priority(&id, priority))?.flatten() {
                Some(todo) => println!("{}", render_line(&todo, Utc::now())),
                None => not_found(&id),
            }
        }
        Command::Rm { id } => {
            let id = resolve_id(manager, &id);
            let outcome = settle(manager.delete(&id, confirm))?;
            if outcome == Some(Outcome::Unchanged) {
                not_found(&id);
            }
            report_declined(outcome);
        }
        Command::ClearCompleted => {
            report_declined(settle(manager.clear_completed(confirm))?);
        }
        Command::ClearAll => {
            report_declined(settle(manager.clear_all(confirm))?);
        }
        Command::Stats { json } => {
            let stats = manager.stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", render_stats(&stats));
            }
        }
        Command::Export { output } => {
            let path = export_to(manager, output.as_deref(), Utc::now())?;
            println!("✓ Todos exported successfully! ({})", path.display());
        }
        Command::Import { path } => {
            let payload = fs::read_to_string(&path)
                .map_err(|e| eyre!("failed to read {}: {e}", path.display()))?;
            report_declined(settle(manager.import(&payload, confirm))?);
        }
        other => return Err(eyre!("`{other:?}` is not a todo command")),
    }

    Ok(())
}

/// Validation failures were already shown through the notifier; anything else
/// is a real error for the caller.
fn settle<T>(result: Result<T, TodoError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(TodoError::EmptyText | TodoError::Format { .. }) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn report_declined(outcome: Option<Outcome>) {
    if outcome == Some(Outcome::Declined) {
        println!("Cancelled; nothing changed.");
    }
}

fn not_found(id: &str) {
    debug!(id, "no matching todo");
    eprintln!("No todo matches `{id}`.");
}

/// Expand a unique id prefix; unknown input passes through unchanged.
fn resolve_id<S: KeyValueStore>(manager: &TodoListManager<S>, raw: &str) -> String {
    manager
        .resolve(raw)
        .map(|t| t.id.clone())
        .unwrap_or_else(|| raw.to_string())
}

fn short_id(id: &str) -> &str {
    id.char_indices()
        .nth(SHORT_ID_LEN)
        .map_or(id, |(idx, _)| &id[..idx])
}

fn render_line(todo: &TodoItem, now: DateTime<Utc>) -> String {
    let mark = if todo.completed { "x" } else { " " };
    format!(
        "{:<width$} [{mark}] {}  ({}, {})  {}",
        short_id(&todo.id),
        todo.text,
        todo.category,
        todo.priority,
        describe_dates(todo.created_at, todo.completed_at, now),
        width = SHORT_ID_LEN
    )
}

fn empty_message<S: KeyValueStore>(manager: &TodoListManager<S>) -> &'static str {
    if manager.is_empty() {
        "No todos yet. Add one with `ticklist add <text>`."
    } else if !manager.filters().search().is_empty() {
        "No matches found. Try adjusting your search or filters."
    } else {
        "No todos match your filters."
    }
}

fn render_stats(stats: &Stats) -> String {
    let mut out = format!(
        "total: {}  active: {}  completed: {}\n",
        stats.total, stats.active, stats.completed
    );
    let categories = stats
        .by_category
        .iter()
        .map(|(c, n)| format!("{c}={n}"))
        .collect::<Vec<_>>()
        .join(" ");
    let priorities = stats
        .by_priority
        .iter()
        .map(|(p, n)| format!("{p}={n}"))
        .collect::<Vec<_>>()
        .join(" ");
    out.push_str(&format!("by category: {categories}\nby priority: {priorities}\n"));
    out
}

/// Write the export bundle. A directory target receives the dated file name.
fn export_to<S: KeyValueStore>(
    manager: &TodoListManager<S>,
    output: Option<&Path>,
    now: DateTime<Utc>,
) -> Result<PathBuf> {
    let bundle = manager.export(now)?;
    let path = match output {
        Some(dir) if dir.is_dir() => dir.join(&bundle.file_name),
        Some(file) => file.to_path_buf(),
        None => PathBuf::from(&bundle.file_name),
    };
    fs::write(&path, &bundle.contents)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use ticklist_core::{
        confirm::ConfirmRequest,
        notify::SilentNotifier,
        storage::InMemoryStore,
        todos::{Category, Priority},
    };
    use ticklist_manager::{ManagerSettings, StatusFilter};

    use super::*;

    fn manager() -> TodoListManager<InMemoryStore> {
        TodoListManager::load(
            InMemoryStore::new(),
            Box::new(SilentNotifier),
            ManagerSettings::default(),
        )
        .expect("load")
    }

    #[test]
    fn add_and_toggle_by_prefix() {
        let mut mgr = manager();
        let mut yes = |_: &ConfirmRequest| true;
        handle(
            Command::Add {
                text: vec!["Buy".into(), "milk".into()],
                category: Some(Category::Shopping),
                priority: None,
            },
            &mut mgr,
            &mut yes,
        )
        .expect("add");
        let id = mgr.todos()[0].id.clone();
        assert_eq!(mgr.todos()[0].text, "Buy milk");

        handle(
            Command::Toggle {
                id: short_id(&id).to_string(),
            },
            &mut mgr,
            &mut yes,
        )
        .expect("toggle");
        assert!(mgr.todos()[0].completed);
    }

    #[test]
    fn blank_add_is_not_an_error() {
        let mut mgr = manager();
        let mut yes = |_: &ConfirmRequest| true;
        handle(
            Command::Add {
                text: vec!["   ".into()],
                category: None,
                priority: None,
            },
            &mut mgr,
            &mut yes,
        )
        .expect("validation is reported, not raised");
        assert!(mgr.is_empty());
    }

    #[test]
    fn edit_keeps_category_when_not_given() {
        let mut mgr = manager();
        let todo = mgr
            .add("Draft", Some(Category::Work), Some(Priority::Low))
            .expect("add");
        let mut yes = |_: &ConfirmRequest| true;
        handle(
            Command::Edit {
                id: todo.id.clone(),
                text: vec!["Final".into()],
                category: None,
            },
            &mut mgr,
            &mut yes,
        )
        .expect("edit");
        assert_eq!(mgr.todos()[0].text, "Final");
        assert_eq!(mgr.todos()[0].category, Category::Work);
    }

    #[test]
    fn list_applies_filters_to_manager() {
        let mut mgr = manager();
        let mut yes = |_: &ConfirmRequest| true;
        handle(
            Command::List {
                status: StatusFilter::Active,
                category: "work".parse().expect("category"),
                search: Some("Report".into()),
                json: true,
            },
            &mut mgr,
            &mut yes,
        )
        .expect("list");
        assert_eq!(mgr.filters().status, StatusFilter::Active);
        assert_eq!(mgr.filters().search(), "report");
    }

    #[test]
    fn non_todo_commands_are_rejected() {
        let mut mgr = manager();
        let mut yes = |_: &ConfirmRequest| true;
        assert!(handle(Command::Version, &mut mgr, &mut yes).is_err());
    }

    #[test]
    fn export_writes_dated_file_into_directory() {
        let mut mgr = manager();
        mgr.add("Plan trip", None, None).expect("add");
        let dir = tempfile::tempdir().expect("tempdir");
        let now = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();

        let path = export_to(&mgr, Some(dir.path()), now).expect("export");
        assert_eq!(path, dir.path().join("todos-2024-02-29.json"));
        let written = fs::read_to_string(&path).expect("read export");

        let mut other = manager();
        other
            .import(&written, &mut |_: &ConfirmRequest| true)
            .expect("import");
        assert_eq!(other.todos(), mgr.todos());
    }

    #[test]
    fn renders_stats_summary() {
        let mut mgr = manager();
        mgr.add("a", Some(Category::Health), None).expect("add");
        let text = render_stats(&mgr.stats());
        assert!(text.starts_with("total: 1  active: 1  completed: 0"));
        assert!(text.contains("health=1"));
        assert!(text.contains("medium=1"));
        assert_eq!(text.lines().count(), 3);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn list_line_shows_creation_and_completion_dates() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let mut todo = TodoItem::new("Jog".into(), Category::Health, Priority::Low);
        todo.id = "0123456789".into();
        todo.created_at = Utc.with_ymd_and_hms(2024, 3, 9, 8, 0, 0).unwrap();
        assert_eq!(
            render_line(&todo, now),
            "01234567 [ ] Jog  (health, low)  Created Yesterday"
        );

        todo.set_completed(true, now);
        assert!(render_line(&todo, now).ends_with("Created Yesterday · Completed Today"));
    }

    #[test]
    fn empty_message_depends_on_state() {
        let mut mgr = manager();
        assert!(empty_message(&mgr).starts_with("No todos yet"));
        mgr.add("a", None, None).expect("add");
        mgr.set_search("zzz");
        assert!(empty_message(&mgr).starts_with("No matches found"));
        mgr.set_search("");
        mgr.set_filter(StatusFilter::Completed);
        assert_eq!(empty_message(&mgr), "No todos match your filters.");
    }

    #[test]
    fn short_id_truncates_long_ids_only() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }
}
