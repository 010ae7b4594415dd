//! Chat orchestration and repository trait definitions for Parley.
//!
//! This crate defines the "ports" (repository and backend traits) that the
//! infrastructure layer implements, plus the response cache, the history
//! window, and the orchestrator that ties them together. It depends only on
//! `parley-types` -- never on `parley-infra` or any database/HTTP crate.

pub mod backend;
pub mod cache;
pub mod chat;
pub mod repository;
pub mod text;
