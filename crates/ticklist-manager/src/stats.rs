use std::collections::BTreeMap;

use serde::Serialize;
use ticklist_core::todos::{Category, Priority, TodoItem};

/// Counts over the whole collection, ignoring view filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub by_category: BTreeMap<Category, usize>,
    pub by_priority: BTreeMap<Priority, usize>,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            total: 0,
            active: 0,
            completed: 0,
            by_category: Category::ALL.iter().map(|c| (*c, 0)).collect(),
            by_priority: Priority::ALL.iter().map(|p| (*p, 0)).collect(),
        }
    }
}

impl Stats {
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a TodoItem>) -> Self {
        items.into_iter().fold(Stats::default(), |mut stats, item| {
            stats.total += 1;
            if item.completed {
                stats.completed += 1;
            } else {
                stats.active += 1;
            }
            *stats.by_category.entry(item.category).or_default() += 1;
            *stats.by_priority.entry(item.priority).or_default() += 1;
            stats
        })
    }
}
