use parley_types::chat::ChatTurn;
use parley_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for persisted chat turns.
///
/// All listing methods return turns newest-first by `occurred_at`.
pub trait ConversationRepository: Send + Sync {
    /// The `limit` most recent turns for a user, newest first.
    fn recent_turns(
        &self,
        user_id: &Uuid,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<ChatTurn>, RepositoryError>> + Send;

    /// Every turn for a user, newest first.
    fn all_turns(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<ChatTurn>, RepositoryError>> + Send;

    /// Persist a new turn. The store assigns `id` and `occurred_at`.
    fn append(
        &self,
        user_id: &Uuid,
        query: &str,
        reply: &str,
        intent: &str,
    ) -> impl std::future::Future<Output = Result<ChatTurn, RepositoryError>> + Send;
}
