//! Concrete storage implementations for the key-value store contract.
//! Values live as one file per key under a data directory, replaced atomically.

pub mod file_store;
