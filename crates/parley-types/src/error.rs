use thiserror::Error;

/// Errors from repository operations (used by trait definitions in parley-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from a call to the reply-generation backend.
///
/// Every variant is recovered by the orchestrator into the fallback response;
/// callers of `process_message` never see one.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Transport(String),

    #[error("backend request timed out")]
    Timeout,

    #[error("backend returned HTTP {status}: {excerpt}")]
    Status { status: u16, excerpt: String },

    #[error("malformed backend response: {0}")]
    Malformed(String),
}

/// Errors surfaced by the chat orchestrator to its callers.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("user '{0}' not found")]
    UserNotFound(String),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_backend_status_error_display() {
        let err = BackendError::Status {
            status: 503,
            excerpt: "upstream unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "backend returned HTTP 503: upstream unavailable");
    }

    #[test]
    fn test_chat_error_from_repository() {
        let err: ChatError = RepositoryError::Connection.into();
        assert!(matches!(err, ChatError::Storage(RepositoryError::Connection)));
        assert_eq!(
            ChatError::UserNotFound("alice".to_string()).to_string(),
            "user 'alice' not found"
        );
    }
}
