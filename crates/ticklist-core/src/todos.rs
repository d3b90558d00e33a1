use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Fixed set of tags a todo can be filed under.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Personal,
    Work,
    Shopping,
    Health,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Personal,
        Category::Work,
        Category::Shopping,
        Category::Health,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Personal => "personal",
            Category::Work => "work",
            Category::Shopping => "shopping",
            Category::Health => "health",
            Category::Other => "other",
        }
    }
}

/// Importance hint; purely informational, never affects ordering.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} `{value}` (expected one of: {expected})")]
pub struct ParseLabelError {
    kind: &'static str,
    value: String,
    expected: String,
}

impl ParseLabelError {
    fn new(kind: &'static str, value: &str, expected: impl Iterator<Item = &'static str>) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected: expected.collect::<Vec<_>>().join(", "),
        }
    }
}

impl FromStr for Category {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| {
                ParseLabelError::new("category", s, Category::ALL.iter().map(|c| c.as_str()))
            })
    }
}

impl FromStr for Priority {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str() == needle)
            .ok_or_else(|| {
                ParseLabelError::new("priority", s, Priority::ALL.iter().map(|p| p.as_str()))
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single todo record. The serialized shape is the persisted/exported format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: String,
    pub text: String,
    pub category: Category,
    #[serde(default)]
    pub priority: Priority,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TodoItem {
    /// Build a fresh, active item. Callers are expected to pass already-trimmed text.
    pub fn new(text: String, category: Category, priority: Priority) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text,
            category,
            priority,
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Change completion state, keeping `completed_at` in lockstep with `completed`.
    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        self.completed = completed;
        self.completed_at = completed.then_some(now);
    }

    /// Whether the record satisfies the model invariants (non-blank text,
    /// completion timestamp present exactly when completed).
    pub fn is_well_formed(&self) -> bool {
        !self.text.trim().is_empty() && self.completed == self.completed_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_items_are_active_with_unique_ids() {
        let a = TodoItem::new("Buy milk".into(), Category::Personal, Priority::Medium);
        let b = TodoItem::new("Buy milk".into(), Category::Personal, Priority::Medium);
        assert!(!a.completed);
        assert!(a.completed_at.is_none());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn set_completed_tracks_timestamp() {
        let mut item = TodoItem::new("Ship".into(), Category::Work, Priority::High);
        let now = Utc::now();
        item.set_completed(true, now);
        assert_eq!(item.completed_at, Some(now));
        item.set_completed(false, now);
        assert!(item.completed_at.is_none());
        assert!(item.is_well_formed());
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let item = TodoItem::new("Write report".into(), Category::Work, Priority::Low);
        let value = serde_json::to_value(&item).expect("serialize");
        let obj = value.as_object().expect("object");
        for key in [
            "id",
            "text",
            "category",
            "priority",
            "completed",
            "createdAt",
            "completedAt",
        ] {
            assert!(obj.contains_key(key), "missing {key}");
        }
        assert_eq!(obj["category"], "work");
        assert!(obj["completedAt"].is_null());
    }

    #[test]
    fn deserializes_records_without_priority() {
        let json = r#"{
            "id": "lx3k9abc",
            "text": "Jog",
            "category": "health",
            "completed": true,
            "createdAt": "2024-03-01T10:00:00.000Z",
            "completedAt": "2024-03-02T08:30:00.000Z"
        }"#;
        let item: TodoItem = serde_json::from_str(json).expect("deserialize");
        assert_eq!(item.priority, Priority::Medium);
        assert_eq!(item.category, Category::Health);
        assert!(item.is_well_formed());
    }

    #[test]
    fn parses_labels_case_insensitively() {
        assert_eq!("Work".parse::<Category>(), Ok(Category::Work));
        assert_eq!(" high ".parse::<Priority>(), Ok(Priority::High));
        let err = "errands".parse::<Category>().expect_err("unknown category");
        assert!(err.to_string().contains("personal, work"));
    }
}
