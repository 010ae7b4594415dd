//! Chat orchestration for Parley.
//!
//! [`ChatOrchestrator`](orchestrator::ChatOrchestrator) turns a user's message
//! into a reply using the response cache, the recent-history window, and the
//! reply backend, falling back to a fixed apology when the backend fails.

pub mod history;
pub mod orchestrator;
