//! Core abstractions for Ticklist: the todo data model, the key-value store
//! contract, and the notice/confirmation seams a front-end plugs into.
//! This crate is intentionally small to keep dependency surface minimal.

pub mod confirm;
pub mod notify;
pub mod storage;
pub mod todos;
