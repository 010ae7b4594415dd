//! SQLite conversation repository implementation.
//!
//! Implements `ConversationRepository` from `parley-core` using sqlx with split
//! read/write pools. Turns are listed newest first; ties on `occurred_at` fall
//! back to the time-ordered v7 id.

use chrono::Utc;
use parley_core::repository::conversation::ConversationRepository;
use parley_types::chat::ChatTurn;
use parley_types::error::RepositoryError;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `ConversationRepository`.
pub struct SqliteConversationRepository {
    pool: DatabasePool,
}

impl SqliteConversationRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn list(&self, user_id: &Uuid, limit: Option<usize>) -> Result<Vec<ChatTurn>, RepositoryError> {
        let mut sql = String::from(
            "SELECT * FROM conversations WHERE user_id = ? ORDER BY occurred_at DESC, id DESC",
        );
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        let rows = sqlx::query(&sql)
            .bind(user_id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut turns = Vec::with_capacity(rows.len());
        for row in &rows {
            let turn_row =
                ChatTurnRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            turns.push(turn_row.into_turn()?);
        }
        Ok(turns)
    }
}

/// Internal row type for mapping SQLite rows to domain ChatTurn.
struct ChatTurnRow {
    id: String,
    user_id: String,
    query: String,
    reply: String,
    intent: String,
    occurred_at: String,
}

impl ChatTurnRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            query: row.try_get("query")?,
            reply: row.try_get("reply")?,
            intent: row.try_get("intent")?,
            occurred_at: row.try_get("occurred_at")?,
        })
    }

    fn into_turn(self) -> Result<ChatTurn, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid turn id: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| RepositoryError::Query(format!("invalid user_id: {e}")))?;

        Ok(ChatTurn {
            id,
            user_id,
            query: self.query,
            reply: self.reply,
            intent: self.intent,
            occurred_at: parse_datetime(&self.occurred_at)?,
        })
    }
}

impl ConversationRepository for SqliteConversationRepository {
    async fn recent_turns(
        &self,
        user_id: &Uuid,
        limit: usize,
    ) -> Result<Vec<ChatTurn>, RepositoryError> {
        self.list(user_id, Some(limit)).await
    }

    async fn all_turns(&self, user_id: &Uuid) -> Result<Vec<ChatTurn>, RepositoryError> {
        self.list(user_id, None).await
    }

    async fn append(
        &self,
        user_id: &Uuid,
        query: &str,
        reply: &str,
        intent: &str,
    ) -> Result<ChatTurn, RepositoryError> {
        let turn = ChatTurn {
            id: Uuid::now_v7(),
            user_id: *user_id,
            query: query.to_string(),
            reply: reply.to_string(),
            intent: intent.to_string(),
            occurred_at: Utc::now(),
        };

        sqlx::query(
            r#"INSERT INTO conversations (id, user_id, query, reply, intent, occurred_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(turn.id.to_string())
        .bind(turn.user_id.to_string())
        .bind(&turn.query)
        .bind(&turn.reply)
        .bind(&turn.intent)
        .bind(format_datetime(&turn.occurred_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(turn)
    }
}

#[cfg(test)]
mod tests {
    use parley_core::repository::user::UserRepository;

    use super::*;
    use crate::sqlite::pool::default_database_url;
    use crate::sqlite::user::SqliteUserRepository;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let url = default_database_url(dir.path());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    async fn seeded_user(pool: &DatabasePool, name: &str) -> Uuid {
        SqliteUserRepository::new(pool.clone())
            .create_user(name)
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_append_and_list_newest_first() {
        let pool = test_pool().await;
        let repo = SqliteConversationRepository::new(pool.clone());
        let alice = seeded_user(&pool, "alice").await;

        for i in 0..3 {
            repo.append(&alice, &format!("q{i}"), &format!("r{i}"), "other")
                .await
                .unwrap();
        }

        let turns = repo.all_turns(&alice).await.unwrap();
        let queries: Vec<&str> = turns.iter().map(|t| t.query.as_str()).collect();
        assert_eq!(queries, ["q2", "q1", "q0"]);
        assert!(turns[0].occurred_at >= turns[1].occurred_at);
    }

    #[tokio::test]
    async fn test_recent_turns_respects_limit() {
        let pool = test_pool().await;
        let repo = SqliteConversationRepository::new(pool.clone());
        let alice = seeded_user(&pool, "alice").await;

        for i in 0..12 {
            repo.append(&alice, &format!("q{i}"), "r", "other").await.unwrap();
        }

        let recent = repo.recent_turns(&alice, 10).await.unwrap();
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].query, "q11");
        assert_eq!(recent[9].query, "q2");
    }

    #[tokio::test]
    async fn test_turns_are_scoped_to_user() {
        let pool = test_pool().await;
        let repo = SqliteConversationRepository::new(pool.clone());
        let alice = seeded_user(&pool, "alice").await;
        let bob = seeded_user(&pool, "bob").await;

        repo.append(&alice, "hello", "hi alice", "greeting").await.unwrap();
        repo.append(&bob, "hello", "hi bob", "greeting").await.unwrap();

        let turns = repo.all_turns(&bob).await.unwrap();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].reply, "hi bob");
        assert_eq!(turns[0].user_id, bob);
    }

    #[tokio::test]
    async fn test_append_returns_stored_turn() {
        let pool = test_pool().await;
        let repo = SqliteConversationRepository::new(pool.clone());
        let alice = seeded_user(&pool, "alice").await;

        let turn = repo.append(&alice, "weather?", "sunny", "weather").await.unwrap();
        let stored = repo.all_turns(&alice).await.unwrap();

        assert_eq!(stored[0].id, turn.id);
        assert_eq!(stored[0].intent, "weather");
        assert_eq!(stored[0].occurred_at, turn.occurred_at);
    }

    #[tokio::test]
    async fn test_append_for_unknown_user_fails() {
        let repo = SqliteConversationRepository::new(test_pool().await);
        let err = repo
            .append(&Uuid::now_v7(), "hello", "hi", "greeting")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Query(_)));
    }
}
