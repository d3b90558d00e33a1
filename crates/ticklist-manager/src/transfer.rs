use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use ticklist_core::todos::TodoItem;

use crate::error::TodoError;

/// A serialized snapshot of the full collection, ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBundle {
    /// Suggested file name, e.g. `todos-2024-05-01.json`.
    pub file_name: String,
    pub exported_on: NaiveDate,
    /// Pretty-printed JSON array of todo records.
    pub contents: String,
}

pub fn export(todos: &[TodoItem], now: DateTime<Utc>) -> Result<ExportBundle, TodoError> {
    let exported_on = now.date_naive();
    let contents = serde_json::to_string_pretty(todos).map_err(TodoError::Encode)?;
    Ok(ExportBundle {
        file_name: format!("todos-{}.json", exported_on.format("%Y-%m-%d")),
        exported_on,
        contents,
    })
}

/// Decode and validate an import payload without touching any state.
pub fn parse_import(payload: &str) -> Result<Vec<TodoItem>, TodoError> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|err| TodoError::format(format!("not valid JSON: {err}")))?;
    if !value.is_array() {
        return Err(TodoError::format("expected a JSON array of todos"));
    }
    let todos: Vec<TodoItem> = serde_json::from_value(value)
        .map_err(|err| TodoError::format(format!("record does not look like a todo: {err}")))?;
    check_records(&todos)?;
    Ok(todos)
}

/// Per-record rules every collection must satisfy, whether imported or loaded.
pub(crate) fn check_records(todos: &[TodoItem]) -> Result<(), TodoError> {
    let mut seen = HashSet::with_capacity(todos.len());
    for (idx, todo) in todos.iter().enumerate() {
        if !todo.is_well_formed() {
            return Err(TodoError::format(format!(
                "record {idx} has blank text or an inconsistent completion timestamp"
            )));
        }
        if !seen.insert(todo.id.as_str()) {
            return Err(TodoError::format(format!(
                "record {idx} reuses id `{}`",
                todo.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use ticklist_core::todos::{Category, Priority};

    use super::*;

    #[test]
    fn export_names_file_after_date() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 23, 59, 0).unwrap();
        let bundle = export(&[], now).expect("export");
        assert_eq!(bundle.file_name, "todos-2024-05-01.json");
        assert_eq!(bundle.contents, "[]");
    }

    #[test]
    fn export_is_pretty_printed() {
        let todos = vec![TodoItem::new("Plan".into(), Category::Work, Priority::Medium)];
        let bundle = export(&todos, Utc::now()).expect("export");
        assert!(bundle.contents.contains("\n  {"));
        assert!(bundle.contents.contains("\"createdAt\""));
    }

    #[test]
    fn rejects_object_payload() {
        let err = parse_import(r#"{"todos": []}"#).expect_err("object is not a list");
        assert!(matches!(err, TodoError::Format { .. }));
    }

    #[test]
    fn rejects_non_todo_records() {
        let err = parse_import(r#"[{"name": "x"}]"#).expect_err("wrong shape");
        assert!(matches!(err, TodoError::Format { .. }));
    }

    #[test]
    fn rejects_blank_text_and_duplicate_ids() {
        let blank = r#"[{"id":"a","text":"  ","category":"work","completed":false,
            "createdAt":"2024-01-01T00:00:00Z","completedAt":null}]"#;
        assert!(matches!(
            parse_import(blank),
            Err(TodoError::Format { .. })
        ));

        let dupes = r#"[
            {"id":"a","text":"one","category":"work","completed":false,
             "createdAt":"2024-01-01T00:00:00Z","completedAt":null},
            {"id":"a","text":"two","category":"work","completed":false,
             "createdAt":"2024-01-01T00:00:00Z","completedAt":null}
        ]"#;
        let err = parse_import(dupes).expect_err("duplicate ids");
        assert!(err.to_string().contains("reuses id"));
    }

    #[test]
    fn rejects_completion_without_timestamp() {
        let payload = r#"[{"id":"a","text":"one","category":"work","completed":true,
            "createdAt":"2024-01-01T00:00:00Z","completedAt":null}]"#;
        assert!(parse_import(payload).is_err());
    }

    #[test]
    fn accepts_empty_array() {
        assert!(parse_import("[]").expect("empty list").is_empty());
    }
}
