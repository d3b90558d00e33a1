//! The todo list manager: an ordered collection of todos, the view filters
//! over it, and a write-through mirror of every change into a `KeyValueStore`.

pub mod error;
pub mod filter;
mod manager;
pub mod repo;
pub mod stats;
pub mod transfer;

pub use error::TodoError;
pub use filter::{CategoryFilter, StatusFilter, ViewFilter};
pub use manager::{ManagerSettings, Outcome, TodoListManager};
pub use stats::Stats;
pub use transfer::ExportBundle;
