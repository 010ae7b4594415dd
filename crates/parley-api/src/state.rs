//! Application state wiring the orchestrator to its concrete adapters.
//!
//! The orchestrator is generic over repository and backend traits; AppState
//! pins it to SQLite storage and the HTTP reply backend.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use parley_core::cache::ResponseCache;
use parley_core::chat::orchestrator::ChatOrchestrator;
use parley_infra::backend::HttpReplyBackend;
use parley_infra::config::{load_config, resolve_data_dir};
use parley_infra::sqlite::conversation::SqliteConversationRepository;
use parley_infra::sqlite::pool::{default_database_url, DatabasePool};
use parley_infra::sqlite::user::SqliteUserRepository;
use parley_types::config::ParleyConfig;

/// The orchestrator pinned to infra implementations.
pub type ConcreteOrchestrator =
    ChatOrchestrator<SqliteUserRepository, SqliteConversationRepository, HttpReplyBackend>;

/// Shared application state used by every CLI command.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ConcreteOrchestrator>,
    pub cache: Arc<ResponseCache>,
    pub config: ParleyConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load config, connect to the database and wire the orchestrator.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create data dir {}", data_dir.display()))?;

        let config = load_config(&data_dir).await;

        let db_url = config
            .database_url
            .clone()
            .unwrap_or_else(|| default_database_url(&data_dir));
        let db_pool = DatabasePool::new(&db_url)
            .await
            .with_context(|| format!("failed to open database {db_url}"))?;

        let backend = HttpReplyBackend::from_config(&config.backend)?;
        tracing::debug!(endpoint = backend.endpoint(), "Reply backend configured");

        let cache = Arc::new(ResponseCache::new(&config.cache));
        let orchestrator = ChatOrchestrator::new(
            SqliteUserRepository::new(db_pool.clone()),
            SqliteConversationRepository::new(db_pool),
            backend,
            Arc::clone(&cache),
        );

        Ok(Self {
            orchestrator: Arc::new(orchestrator),
            cache,
            config,
            data_dir,
        })
    }
}
