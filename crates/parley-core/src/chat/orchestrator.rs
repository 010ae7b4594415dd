//! Chat orchestrator: cache, history window, backend call, fallback.
//!
//! Per request:
//! 1. Resolve the user (unknown users are the only domain error returned).
//! 2. If caching is enabled and the message is cached, record the turn and
//!    return the cached response unchanged.
//! 3. Otherwise fetch up to [`HISTORY_TURN_LIMIT`] recent turns, build the
//!    context, and call the reply backend.
//! 4. On success record the turn, admit the response to the cache when the
//!    history was short enough, and return it. On any backend failure return
//!    [`ChatResponse::fallback`] without recording or caching anything.
//!
//! Concurrent identical misses are not coalesced: each calls the backend and
//! the last cache write wins.

use std::sync::Arc;

use chrono::Utc;
use parley_types::chat::{ChatResponse, HistoryEntry};
use parley_types::error::ChatError;
use parley_types::user::User;
use tracing::{debug, error, warn};

use super::history::{HistoryWindow, HISTORY_TURN_LIMIT};
use crate::backend::ReplyBackend;
use crate::cache::ResponseCache;
use crate::repository::conversation::ConversationRepository;
use crate::repository::user::UserRepository;
use crate::text::{preview, EXCERPT_CHARS};

/// Coordinates the response cache, conversation history, and reply backend.
///
/// Generic over the repository and backend traits so parley-core never
/// depends on parley-infra. The cache is shared (`Arc`) so a background
/// sweeper can hold it too.
pub struct ChatOrchestrator<U: UserRepository, C: ConversationRepository, B: ReplyBackend> {
    users: U,
    conversations: C,
    backend: B,
    cache: Arc<ResponseCache>,
}

impl<U, C, B> ChatOrchestrator<U, C, B>
where
    U: UserRepository,
    C: ConversationRepository,
    B: ReplyBackend,
{
    pub fn new(users: U, conversations: C, backend: B, cache: Arc<ResponseCache>) -> Self {
        Self {
            users,
            conversations,
            backend,
            cache,
        }
    }

    pub fn users(&self) -> &U {
        &self.users
    }

    pub fn conversations(&self) -> &C {
        &self.conversations
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    /// Produce a reply for `message` from `username`.
    ///
    /// Returns `Err` only for an unknown user or a storage fault while
    /// resolving the user or reading history. Backend failures are absorbed
    /// into the fallback response.
    #[tracing::instrument(name = "process_message", skip_all, fields(user = %username))]
    pub async fn process_message(
        &self,
        username: &str,
        message: &str,
    ) -> Result<ChatResponse, ChatError> {
        let user = self.resolve_user(username).await?;
        debug!(message = %preview(message, EXCERPT_CHARS), "Processing message");

        let caching = self.cache.is_enabled();
        if caching {
            if let Some(cached) = self.cache.get(message) {
                self.record_cached_turn(&user, message, &cached).await;
                return Ok(cached);
            }
        }

        let recent = self
            .conversations
            .recent_turns(&user.id, HISTORY_TURN_LIMIT)
            .await?;
        let window = HistoryWindow::from_turns(&recent);

        debug!(
            backend = self.backend.name(),
            history_size = window.entries().len(),
            "Dispatching to reply backend"
        );

        let reply = match self.backend.generate(message, window.entries()).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, "Reply backend failed, returning fallback");
                return Ok(ChatResponse::fallback(Utc::now()));
            }
        };

        debug!(
            intent = %reply.intent,
            confidence = reply.confidence,
            reply = %preview(&reply.reply, EXCERPT_CHARS),
            "Reply backend succeeded"
        );

        let response = ChatResponse {
            reply: reply.reply,
            intent: reply.intent,
            confidence: reply.confidence,
            produced_at: Utc::now(),
        };

        match self
            .conversations
            .append(&user.id, message, &response.reply, &response.intent)
            .await
        {
            Ok(turn) => debug!(turn_id = %turn.id, intent = %turn.intent, "Conversation persisted"),
            Err(e) => {
                error!(error = %e, "Failed to persist conversation, returning fallback");
                return Ok(ChatResponse::fallback(Utc::now()));
            }
        }

        if caching && window.is_cacheable() {
            self.cache.put(message, &response);
        }

        Ok(response)
    }

    /// Every recorded turn for `username`, newest first.
    pub async fn get_chat_history(&self, username: &str) -> Result<Vec<HistoryEntry>, ChatError> {
        let user = self.resolve_user(username).await?;
        let turns = self.conversations.all_turns(&user.id).await?;
        Ok(turns.into_iter().map(HistoryEntry::from).collect())
    }

    async fn resolve_user(&self, username: &str) -> Result<User, ChatError> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| ChatError::UserNotFound(username.to_string()))
    }

    /// Record a turn served from the cache.
    ///
    /// The cached reply is returned regardless; a storage failure here only
    /// costs the history row.
    async fn record_cached_turn(&self, user: &User, message: &str, cached: &ChatResponse) {
        if let Err(e) = self
            .conversations
            .append(&user.id, message, &cached.reply, &cached.intent)
            .await
        {
            warn!(error = %e, "Failed to persist cached turn");
        }
    }
}
