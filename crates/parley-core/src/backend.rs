//! ReplyBackend trait definition.
//!
//! The reply-generation service is an external collaborator. The orchestrator
//! talks to it only through this trait; the HTTP implementation lives in
//! parley-infra (`HttpReplyBackend`).

use parley_types::backend::BackendReply;
use parley_types::chat::ContextEntry;
use parley_types::error::BackendError;

/// Trait for reply-generation backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
///
/// Implementations perform exactly one outbound attempt per call. Retries,
/// if any, belong to the caller. Transport failures, timeouts, non-success
/// statuses and malformed bodies all surface as [`BackendError`].
pub trait ReplyBackend: Send + Sync {
    /// Human-readable backend name used in log fields.
    fn name(&self) -> &str;

    /// Generate a reply for `message` given the role-tagged `history`.
    fn generate(
        &self,
        message: &str,
        history: &[ContextEntry],
    ) -> impl std::future::Future<Output = Result<BackendReply, BackendError>> + Send;
}
