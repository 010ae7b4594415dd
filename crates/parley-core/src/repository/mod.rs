//! Repository trait definitions for the persistence collaborators.
//!
//! Implementations live in parley-infra (e.g., `SqliteConversationRepository`).

pub mod conversation;
pub mod user;
