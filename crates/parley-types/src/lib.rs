//! Shared domain types for Parley.
//!
//! This crate contains the domain types used across the workspace:
//! chat turns, responses, backend payloads, users, configuration,
//! and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod backend;
pub mod chat;
pub mod config;
pub mod error;
pub mod user;
