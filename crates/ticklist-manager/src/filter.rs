use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use ticklist_core::todos::{Category, ParseLabelError, TodoItem};

/// Completion-state predicate for the visible list.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub fn matches(self, item: &TodoItem) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !item.completed,
            StatusFilter::Completed => item.completed,
        }
    }

    /// Next filter in display order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Active,
            StatusFilter::Active => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Completed => "completed",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown status filter `{0}` (expected one of: all, active, completed)")]
pub struct ParseStatusFilterError(String);

impl FromStr for StatusFilter {
    type Err = ParseStatusFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "completed" | "done" => Ok(StatusFilter::Completed),
            _ => Err(ParseStatusFilterError(s.to_string())),
        }
    }
}

/// Category predicate for the visible list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(self, item: &TodoItem) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => item.category == category,
        }
    }

    /// Cycles `all -> personal -> ... -> other -> all`.
    pub fn next(self) -> Self {
        let categories = Category::ALL;
        match self {
            CategoryFilter::All => CategoryFilter::Only(categories[0]),
            CategoryFilter::Only(current) => categories
                .iter()
                .position(|c| *c == current)
                .and_then(|idx| categories.get(idx + 1))
                .map_or(CategoryFilter::All, |c| CategoryFilter::Only(*c)),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Only(category) => category.fmt(f),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}

/// The full set of view predicates. Applied in order: status, category, search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    pub status: StatusFilter,
    pub category: CategoryFilter,
    search: String,
}

impl ViewFilter {
    /// Current search term, already lowercased. Empty means "no search".
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_lowercase();
    }

    pub fn is_default(&self) -> bool {
        *self == ViewFilter::default()
    }

    pub fn matches(&self, item: &TodoItem) -> bool {
        self.status.matches(item)
            && self.category.matches(item)
            && (self.search.is_empty() || item.text.to_lowercase().contains(&self.search))
    }
}
