//! Chat turn, context entry, and response types for Parley.
//!
//! A [`ChatTurn`] is one persisted exchange (query, reply, intent). A
//! [`ChatResponse`] is what the orchestrator hands back to callers and what
//! the response cache stores. [`ContextEntry`] values are derived per request
//! from recent turns and never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Intent label carried by the fallback response. Never cached.
pub const ERROR_INTENT: &str = "error";

/// Reply text returned when the reply backend cannot be reached.
pub const FALLBACK_REPLY: &str =
    "I'm sorry, I'm having trouble processing your request right now. Please try again later.";

/// Speaker of a context entry sent to the reply backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextRole {
    User,
    Assistant,
}

impl fmt::Display for ContextRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextRole::User => write!(f, "user"),
            ContextRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for ContextRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(ContextRole::User),
            "assistant" => Ok(ContextRole::Assistant),
            other => Err(format!("invalid context role: '{other}'")),
        }
    }
}

/// One role-tagged line of conversation context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub role: ContextRole,
    pub content: String,
}

impl ContextEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ContextRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ContextRole::Assistant,
            content: content.into(),
        }
    }
}

/// A persisted exchange between a user and the reply backend.
///
/// Created only by the conversation store, which assigns `id` and
/// `occurred_at`. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: Uuid,
    pub user_id: Uuid,
    pub query: String,
    pub reply: String,
    pub intent: String,
    pub occurred_at: DateTime<Utc>,
}

/// The reply returned to a caller of `process_message`.
///
/// The same value is stored in the response cache, so a cache hit returns the
/// original `produced_at` and `confidence` unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub intent: String,
    pub confidence: f64,
    #[serde(rename = "timestamp")]
    pub produced_at: DateTime<Utc>,
}

impl ChatResponse {
    /// The fixed apology response used when the backend call fails.
    pub fn fallback(produced_at: DateTime<Utc>) -> Self {
        Self {
            reply: FALLBACK_REPLY.to_string(),
            intent: ERROR_INTENT.to_string(),
            confidence: 0.0,
            produced_at,
        }
    }

    /// Whether this response carries the error intent.
    pub fn is_error(&self) -> bool {
        self.intent == ERROR_INTENT
    }
}

/// A row of the chat history listing, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub query: String,
    pub reply: String,
    pub intent: String,
    pub timestamp: DateTime<Utc>,
}

impl From<ChatTurn> for HistoryEntry {
    fn from(turn: ChatTurn) -> Self {
        Self {
            id: turn.id,
            query: turn.query,
            reply: turn.reply,
            intent: turn.intent,
            timestamp: turn.occurred_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_role_roundtrip() {
        for role in [ContextRole::User, ContextRole::Assistant] {
            let parsed: ContextRole = role.to_string().parse().unwrap();
            assert_eq!(role, parsed);
        }
        assert!("system".parse::<ContextRole>().is_err());
    }

    #[test]
    fn test_context_entry_serde_shape() {
        let entry = ContextEntry::assistant("hi there");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, serde_json::json!({"role": "assistant", "content": "hi there"}));
    }

    #[test]
    fn test_fallback_response() {
        let now = Utc::now();
        let resp = ChatResponse::fallback(now);
        assert_eq!(resp.reply, FALLBACK_REPLY);
        assert_eq!(resp.intent, "error");
        assert_eq!(resp.confidence, 0.0);
        assert_eq!(resp.produced_at, now);
        assert!(resp.is_error());
    }

    #[test]
    fn test_chat_response_serializes_timestamp_field() {
        let resp = ChatResponse {
            reply: "Hello!".to_string(),
            intent: "greeting".to_string(),
            confidence: 0.9,
            produced_at: Utc::now(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("timestamp").is_some());
        assert!(json.get("produced_at").is_none());
        assert!(!resp.is_error());
    }

    #[test]
    fn test_history_entry_from_turn() {
        let turn = ChatTurn {
            id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            query: "what time is it".to_string(),
            reply: "noon".to_string(),
            intent: "time".to_string(),
            occurred_at: Utc::now(),
        };
        let entry = HistoryEntry::from(turn.clone());
        assert_eq!(entry.id, turn.id);
        assert_eq!(entry.query, "what time is it");
        assert_eq!(entry.timestamp, turn.occurred_at);
    }
}
