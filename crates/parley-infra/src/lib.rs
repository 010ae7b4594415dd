//! Infrastructure layer for Parley.
//!
//! Concrete implementations of the traits defined in `parley-core`:
//! SQLite repositories, the HTTP reply backend, and configuration loading.

pub mod backend;
pub mod config;
pub mod sqlite;
